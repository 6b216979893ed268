// Kaori Mood Engine — the `analyze` pipeline.
//
//   user text ─► SentimentSource (LLM, external) ─► parse ─► validate
//             ─► MoodStore::apply_update ─► select ─► Option<Reaction>
//
// The model call is the only await point. Everything after it is
// synchronous CPU work, and nothing touches the store until the response
// has parsed and validated, so a cancelled, late or bad response leaves the
// mood exactly as it was.

use crate::atoms::error::{MoodError, MoodResult};
use crate::atoms::types::{MoodVector, Reaction};
use crate::config::MoodSettings;
use crate::mood::reaction::{self, ReactionRng, StdReactionRng};
use crate::mood::{parse, validate, MoodStore};
use async_trait::async_trait;
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

// ── Sentiment source ───────────────────────────────────────────────────────

/// External text generator that scores a user message against Kaori's last
/// utterance. Its output is untrusted and goes through parse + validate.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn sentiment(&self, previous: &str, user: &str) -> MoodResult<String>;
}

#[async_trait]
impl<T: SentimentSource + ?Sized> SentimentSource for Arc<T> {
    async fn sentiment(&self, previous: &str, user: &str) -> MoodResult<String> {
        (**self).sentiment(previous, user).await
    }
}

// ── Engine ─────────────────────────────────────────────────────────────────

pub struct MoodEngine<S> {
    store: Arc<MoodStore>,
    settings: Arc<MoodSettings>,
    source: S,
    rng: Mutex<Box<dyn ReactionRng>>,
}

impl<S: SentimentSource> MoodEngine<S> {
    pub fn new(store: Arc<MoodStore>, settings: Arc<MoodSettings>, source: S) -> Self {
        MoodEngine {
            store,
            settings,
            source,
            rng: Mutex::new(Box::new(StdReactionRng::from_entropy())),
        }
    }

    /// Replace the random source used to choose among candidate symbols.
    pub fn with_rng(mut self, rng: impl ReactionRng + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn store(&self) -> &Arc<MoodStore> {
        &self.store
    }

    pub fn settings(&self) -> &MoodSettings {
        &self.settings
    }

    /// Score `user_text`, fold it into the mood and maybe pick a reaction.
    ///
    /// Never fails: any error is logged and becomes "no reaction, no change".
    pub async fn analyze(&self, user_text: &str) -> Option<Reaction> {
        match self.try_analyze(user_text).await {
            Ok(reaction) => reaction,
            Err(e) => {
                warn!("[analyze] {}; mood left unchanged", e);
                None
            }
        }
    }

    /// `analyze` with the failure kept, for callers that want to tell
    /// malformed, invalid and timed-out responses apart.
    pub async fn try_analyze(&self, user_text: &str) -> MoodResult<Option<Reaction>> {
        let previous = self.previous_text();
        let timeout = self.settings.analysis.timeout;

        let raw = tokio::time::timeout(timeout, self.source.sentiment(&previous, user_text))
            .await
            .map_err(|_| MoodError::Timeout(timeout))??;

        let delta = validate(&parse(&raw)?)?;
        let updated = self.store.apply_update(&delta, &self.settings.weights);
        info!("[analyze] Mood now {}", updated);

        let reaction = self.select(&updated);
        if let Some(ref r) = reaction {
            info!("[analyze] Reacting {} ({} {:?})", r.symbol, r.dimension, r.polarity);
        }
        Ok(reaction)
    }

    /// Reaction for an arbitrary vector under the configured policy.
    pub fn select(&self, vector: &MoodVector) -> Option<Reaction> {
        let mut rng = self.rng.lock();
        reaction::select(vector, &self.settings.policy, &self.settings.tables, rng.as_mut())
    }

    /// Kaori's last utterance, or the neutral opener before she has spoken.
    fn previous_text(&self) -> String {
        let context = self.store.context();
        match context.last_text.trim() {
            "" => self.settings.analysis.neutral_start.clone(),
            text => text.to_string(),
        }
    }
}
