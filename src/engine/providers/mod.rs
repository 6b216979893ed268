// Kaori Engine — Reply Providers
// The reply side of the model boundary. Sentiment scoring has its own trait
// in kaori-core (`SentimentSource`); a backend that can do both implements
// both, as `GeminiClient` does.

pub mod google;

pub use google::GeminiClient;

use crate::atoms::constants::{CHAT_INSTRUCTION, MOOD_SCALE_NOTE};
use crate::atoms::error::EngineResult;
use async_trait::async_trait;
use kaori_core::MoodVector;

// ── Reply request ──────────────────────────────────────────────────────────

/// One reply to generate: what Kaori is asked to do, what the user said,
/// and how she currently feels.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    /// Task-specific instruction appended after the persona, if any.
    pub instruction: Option<String>,
    pub user_text: String,
    pub mood: MoodVector,
}

impl ReplyRequest {
    /// Ordinary conversational reply.
    pub fn chat(user_text: impl Into<String>, mood: MoodVector) -> Self {
        ReplyRequest { instruction: None, user_text: user_text.into(), mood }
    }

    /// Scheduled greeting: a fixed instruction plus a fixed opener line.
    pub fn greeting(instruction: &str, opener: &str, mood: MoodVector) -> Self {
        ReplyRequest {
            instruction: Some(instruction.to_string()),
            user_text: opener.to_string(),
            mood,
        }
    }

    /// System prompt: persona, rendered mood, scale note, then the task.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "{} Your mood is defined by: {}. {}",
            CHAT_INSTRUCTION, self.mood, MOOD_SCALE_NOTE
        );
        if let Some(ref instruction) = self.instruction {
            prompt.push('\n');
            prompt.push_str(instruction);
        }
        prompt
    }
}

// ── Reply generator trait ──────────────────────────────────────────────────

/// Anything that can turn a `ReplyRequest` into Kaori's words.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    async fn reply(&self, request: &ReplyRequest) -> EngineResult<String>;
}
