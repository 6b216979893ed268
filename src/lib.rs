// Kaori — a companion bot with a mood.
//
// kaori-core owns the affective state; this crate wires it to a model
// provider (Gemini), a delivery channel (the console) and a scheduler,
// and exposes `run` for the binary.

pub mod atoms;
pub mod config;
pub mod engine;

use crate::atoms::error::{EngineError, EngineResult};
use crate::config::Settings;
use crate::engine::channels::{Channel, ConsoleChannel};
use crate::engine::providers::GeminiClient;
use crate::engine::state::KaoriState;
use crate::engine::{chat, scheduler};
use log::{info, warn};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the greeting loops even if `[schedule] enabled = true`.
    pub no_schedule: bool,
}

/// Build the runtime from validated settings and talk on stdin/stdout until
/// input closes or Ctrl-C arrives.
pub async fn run(mut settings: Settings, options: RunOptions) -> EngineResult<()> {
    let key_env = settings.provider.api_key_env.clone();
    let api_key = std::env::var(&key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            EngineError::config(format!("environment variable {} is not set", key_env))
        })?;

    if options.no_schedule {
        settings.schedule.enabled = false;
    }

    let gemini = Arc::new(GeminiClient::new(&settings.provider, api_key)?);
    let channel: Arc<dyn Channel> = Arc::new(ConsoleChannel::stdout());
    let state = Arc::new(KaoriState::new(settings, gemini.clone(), gemini, channel));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let tasks = scheduler::spawn(state.clone(), shutdown_rx);

    info!("Kaori is listening. Type a message, Ctrl-D to quit.");
    let input = BufReader::new(tokio::io::stdin());
    let result = tokio::select! {
        r = chat::run_console(&state, input) => r.map(|_| ()),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };

    if shutdown_tx.send(true).is_err() {
        warn!("[scheduler] All tasks already stopped");
    }
    for task in tasks {
        if let Err(e) = task.await {
            warn!("[scheduler] Task ended abnormally: {}", e);
        }
    }
    result
}
