// Kaori Core — affective state engine.
//
// Turns the free-text sentiment a language model writes about a message
// into a bounded, decaying six-dimension mood, and decides whether that mood
// is strong enough to answer with an emoji reaction. No network or disk I/O
// happens here; the model call sits behind the `SentimentSource` trait.

pub mod atoms;
pub mod config;
pub mod engine;
pub mod mood;

pub use atoms::error::{MoodError, MoodResult, SentimentValidationError};
pub use atoms::types::{ConversationContext, Dimension, MoodVector, Polarity, Reaction, SentimentDelta};
pub use config::{MoodConfig, MoodSettings};
pub use engine::{MoodEngine, SentimentSource};
pub use mood::{DecayConfig, DecayOutcome, MoodSnapshot, MoodStore};
