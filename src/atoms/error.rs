// ── Kaori Atoms: Error Types ───────────────────────────────────────────────
// Single canonical error enum for the runtime, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, Config, Provider, Channel…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • No variant carries secret material (API keys) in its message.
//   • Mood-pipeline failures never surface here: `MoodEngine::analyze`
//     absorbs them. `Mood` only carries startup configuration failures.

use kaori_core::MoodError;
use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// AI provider HTTP or API-level failure (non-secret detail only).
    #[error("Provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Channel delivery failure.
    #[error("Channel error: {channel}: {message}")]
    Channel { channel: String, message: String },

    /// Runtime configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mood engine configuration rejected at startup.
    #[error(transparent)]
    Mood(#[from] MoodError),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create a provider error with name and message.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider { provider: provider.into(), message: message.into() }
    }

    /// Create a channel error with name and message.
    pub fn channel(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Channel { channel: channel.into(), message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All runtime operations should return this type.
pub type EngineResult<T> = Result<T, EngineError>;
