// Kaori Engine — Conversation Turn
//
// One user message through the whole bot:
//   analyze (mood + maybe reaction) → react → reply → send → remember
// plus the line-oriented console loop the binary runs on stdin.

use crate::atoms::error::EngineResult;
use crate::engine::providers::ReplyRequest;
use crate::engine::state::KaoriState;
use chrono::Utc;
use kaori_core::Reaction;
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// What one turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reaction: Option<Reaction>,
    pub reply: String,
}

/// Run one conversation turn for `user_text`.
///
/// The mood update never fails the turn; reply generation and delivery can.
/// The reply only becomes Kaori's context once it has been delivered.
pub async fn handle_message(state: &KaoriState, user_text: &str) -> EngineResult<TurnOutcome> {
    let reaction = state.engine.analyze(user_text).await;
    if let Some(ref r) = reaction {
        state.channel.react(&r.symbol).await?;
    }

    let request = ReplyRequest::chat(user_text, state.store().read());
    let reply = state.replier.reply(&request).await?;

    state.channel.send(&reply).await?;
    state.store().set_context(reply.as_str(), Utc::now());

    Ok(TurnOutcome { reaction, reply })
}

/// Feed every non-blank input line through `handle_message` until EOF.
/// A failed turn is logged and the loop moves on to the next line.
/// Returns the number of turns that completed.
pub async fn run_console<R>(state: &KaoriState, input: R) -> EngineResult<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut completed = 0;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        match handle_message(state, text).await {
            Ok(_) => completed += 1,
            Err(e) => warn!("[console] Turn failed: {}", e),
        }
    }

    info!("[console] Input closed after {} turns", completed);
    Ok(completed)
}
