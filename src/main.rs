use clap::Parser;
use kaori::atoms::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use kaori::config::{AppConfig, Settings};
use kaori::RunOptions;
use log::error;
use std::path::PathBuf;

/// Kaori: chat on stdin, with a mood that reacts and relaxes.
#[derive(Debug, Parser)]
#[command(name = "kaori", version, about)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Do not send scheduled morning/evening greetings
    #[arg(long)]
    no_schedule: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = match AppConfig::load(&cli.config).and_then(|c| Settings::from_config(&c)) {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = kaori::run(settings, RunOptions { no_schedule: cli.no_schedule }).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
