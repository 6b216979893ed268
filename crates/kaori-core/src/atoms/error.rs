// ── Kaori Atoms: Error Types ───────────────────────────────────────────────
// Error enums for the mood engine, built with `thiserror`.
//
// Design rules:
//   • Per-call failures (malformed / invalid sentiment, source failure,
//     timeout) are absorbed at `MoodEngine::analyze` and never reach the
//     chat layer.
//   • `Config` is startup-fatal: it is only produced while building
//     `MoodSettings`, before the engine exists.

use crate::atoms::types::Dimension;
use std::time::Duration;
use thiserror::Error;

// ── Validation failures ────────────────────────────────────────────────────

/// First offending dimension found while checking a parsed sentiment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SentimentValidationError {
    #[error("missing dimension '{0}'")]
    MissingDimension(Dimension),

    #[error("unexpected dimension '{0}'")]
    UnknownDimension(String),

    #[error("dimension '{0}' appears more than once")]
    DuplicateDimension(Dimension),

    #[error("dimension '{dimension}' has strength {value}, outside [-1.0, 1.0]")]
    OutOfRange { dimension: Dimension, value: f64 },
}

impl SentimentValidationError {
    /// Name of the dimension the error points at.
    pub fn dimension_name(&self) -> &str {
        match self {
            Self::MissingDimension(d) | Self::DuplicateDimension(d) => d.name(),
            Self::OutOfRange { dimension, .. } => dimension.name(),
            Self::UnknownDimension(name) => name,
        }
    }
}

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MoodError {
    /// Raw sentiment text could not be split into `name:value` pairs.
    #[error("Malformed sentiment: {0}")]
    MalformedSentiment(String),

    /// Parsed sentiment does not match the dimension set or range.
    #[error("Sentiment validation error: {0}")]
    Validation(#[from] SentimentValidationError),

    /// The external sentiment generator failed (non-secret detail only).
    #[error("Sentiment source error: {0}")]
    Source(String),

    /// The external sentiment generator did not answer in time.
    #[error("Sentiment source timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Mood configuration is missing or invalid. Startup-fatal.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MoodError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSentiment(message.into())
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

pub type MoodResult<T> = Result<T, MoodError>;
