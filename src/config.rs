// Kaori runtime configuration — `config.toml`.
//
// The mood tables (`[nature]`, `[decay]`, `[reaction]`, `[analysis]`) are
// owned by kaori-core and flattened in here; this file adds `[provider]` and
// `[schedule]`. Loading and validation happen once, before anything starts.
// Secrets never live in the file: `provider.api_key_env` names the
// environment variable that holds the key.

use crate::atoms::constants::*;
use crate::atoms::error::{EngineError, EngineResult};
use chrono::NaiveTime;
use kaori_core::{MoodConfig, MoodSettings};
use log::info;
use serde::Deserialize;
use std::path::Path;

// ── Raw TOML shape ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub mood: MoodConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub api_key_env: String,
    pub sentiment_temperature: f64,
    pub reply_temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            sentiment_temperature: DEFAULT_SENTIMENT_TEMPERATURE,
            reply_temperature: DEFAULT_REPLY_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    /// Local time, `HH:MM`.
    pub morning: String,
    /// Local time, `HH:MM`.
    pub evening: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            enabled: true,
            morning: DEFAULT_MORNING_AT.to_string(),
            evening: DEFAULT_EVENING_AT.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a full `config.toml` document.
    pub fn from_toml(content: &str) -> EngineResult<Self> {
        toml::from_str::<AppConfig>(content)
            .map_err(|e| EngineError::config(format!("TOML parse error: {e}")))
    }

    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        info!("[config] Loaded {}", path.display());
        Self::from_toml(&content)
    }
}

// ── Validated settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub enabled: bool,
    pub morning: NaiveTime,
    pub evening: NaiveTime,
}

impl ScheduleSettings {
    pub fn from_config(config: &ScheduleConfig) -> EngineResult<Self> {
        Ok(ScheduleSettings {
            enabled: config.enabled,
            morning: parse_time("morning", &config.morning)?,
            evening: parse_time("evening", &config.evening)?,
        })
    }
}

fn parse_time(field: &str, value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        EngineError::config(format!("[schedule] {} must be HH:MM, got '{}'", field, value))
    })
}

/// Everything `run` needs, checked up front.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mood: MoodSettings,
    pub provider: ProviderConfig,
    pub schedule: ScheduleSettings,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> EngineResult<Self> {
        let mood = MoodSettings::from_config(&config.mood)?;
        let schedule = ScheduleSettings::from_config(&config.schedule)?;

        let provider = config.provider.clone();
        if provider.model.trim().is_empty() {
            return Err(EngineError::config("[provider] model must not be empty"));
        }
        for (field, t) in [
            ("sentiment_temperature", provider.sentiment_temperature),
            ("reply_temperature", provider.reply_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(EngineError::config(format!(
                    "[provider] {} must be in [0, 2], got {}",
                    field, t
                )));
            }
        }

        Ok(Settings { mood, provider, schedule })
    }
}
