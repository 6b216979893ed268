// Kaori Engine — Channel Boundary
//
// Where Kaori's words, reactions and presence leave the process. The mood
// engine never sees a channel; chat.rs and scheduler.rs drive one.
//   - Channel trait    — send / react / set_presence
//   - Presence         — online / idle status shown to the user
//   - ConsoleChannel   — line-oriented stdout implementation for the binary

use crate::atoms::error::{EngineError, EngineResult};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;

// ── Presence ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Idle,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Presence::Online => "online",
            Presence::Idle => "idle",
        })
    }
}

// ── Channel trait ──────────────────────────────────────────────────────────

#[async_trait]
pub trait Channel: Send + Sync {
    /// Short channel name for logs and errors.
    fn name(&self) -> &str;

    /// Deliver a message from Kaori.
    async fn send(&self, text: &str) -> EngineResult<()>;

    /// React to the user's latest message with an emoji.
    async fn react(&self, symbol: &str) -> EngineResult<()>;

    async fn set_presence(&self, presence: Presence) -> EngineResult<()>;
}

// ── Console channel ────────────────────────────────────────────────────────

/// Writes everything as prefixed lines:
/// `kaori> text`, `kaori reacts: 💖`, `kaori is now idle`.
pub struct ConsoleChannel<W = std::io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleChannel {
    pub fn stdout() -> Self {
        ConsoleChannel { out: Mutex::new(std::io::stdout()) }
    }
}

impl<W: Write + Send> ConsoleChannel<W> {
    pub fn new(out: W) -> Self {
        ConsoleChannel { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn line(&self, line: &str) -> EngineResult<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", line)
            .and_then(|_| out.flush())
            .map_err(|e| EngineError::channel("console", e.to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> Channel for ConsoleChannel<W> {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, text: &str) -> EngineResult<()> {
        self.line(&format!("kaori> {}", text))
    }

    async fn react(&self, symbol: &str) -> EngineResult<()> {
        self.line(&format!("kaori reacts: {}", symbol))
    }

    async fn set_presence(&self, presence: Presence) -> EngineResult<()> {
        debug!("[console] Presence -> {}", presence);
        self.line(&format!("kaori is now {}", presence))
    }
}
