// Mood store — the one shared, mutable piece of the engine.
//
// Holds the mood vector and the conversation context behind a single
// `parking_lot::RwLock`. Every read-modify-write (merge, decay, context
// update) runs inside one write section, so a reader sees either the state
// before a mutation or after it, never a mix. Reads hand out copies.

use super::decay::{decay_vector, DecayConfig, DecayOutcome};
use super::updater::{merge, SensitivityWeights};
use crate::atoms::types::{ConversationContext, MoodVector, SentimentDelta};
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::RwLock;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct MoodSnapshot {
    pub vector: MoodVector,
    pub context: ConversationContext,
}

#[derive(Debug)]
pub struct MoodStore {
    state: RwLock<MoodSnapshot>,
}

impl Default for MoodStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MoodStore {
    /// Neutral mood; the idle clock starts now.
    pub fn new() -> Self {
        Self::with_state(MoodVector::neutral(), ConversationContext::fresh(Utc::now()))
    }

    pub fn with_state(vector: MoodVector, context: ConversationContext) -> Self {
        MoodStore {
            state: RwLock::new(MoodSnapshot { vector, context }),
        }
    }

    pub fn read(&self) -> MoodVector {
        self.state.read().vector
    }

    pub fn context(&self) -> ConversationContext {
        self.state.read().context.clone()
    }

    /// Vector and context taken under the same read lock.
    pub fn snapshot(&self) -> MoodSnapshot {
        self.state.read().clone()
    }

    /// Merge `delta` and return the vector as it stood right after the merge.
    pub fn apply_update(&self, delta: &SentimentDelta, weights: &SensitivityWeights) -> MoodVector {
        let mut state = self.state.write();
        merge(&mut state.vector, delta, weights);
        state.vector
    }

    pub fn set_context(&self, text: impl Into<String>, at: DateTime<Utc>) {
        let mut state = self.state.write();
        state.context = ConversationContext::new(text, at);
    }

    /// Relax toward neutral if the conversation has been idle long enough.
    /// A `now` earlier than the last interaction counts as zero idle time.
    pub fn decay(&self, config: &DecayConfig, now: DateTime<Utc>) -> DecayOutcome {
        let mut state = self.state.write();
        let idle = (now - state.context.last_interaction)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let outcome = decay_vector(&mut state.vector, config, idle);
        debug!("[mood] Decay after {}s idle: {:?}", idle.as_secs(), outcome);
        outcome
    }
}
