// engine/state.rs — Shared runtime state.
// One `KaoriState` is built at startup and shared (Arc) between the console
// loop and the scheduler tasks. The mood itself lives in the engine's
// `MoodStore`; everything here is either immutable or internally locked.

use crate::config::Settings;
use crate::engine::channels::Channel;
use crate::engine::providers::ReplyGenerator;
use kaori_core::{MoodEngine, MoodStore, SentimentSource};
use log::info;
use std::sync::Arc;

pub type SharedSource = Arc<dyn SentimentSource>;

pub struct KaoriState {
    pub engine: MoodEngine<SharedSource>,
    pub replier: Arc<dyn ReplyGenerator>,
    pub channel: Arc<dyn Channel>,
    pub settings: Arc<Settings>,
}

impl KaoriState {
    /// Start from a neutral mood with no conversation yet.
    pub fn new(
        settings: Settings,
        source: SharedSource,
        replier: Arc<dyn ReplyGenerator>,
        channel: Arc<dyn Channel>,
    ) -> Self {
        let settings = Arc::new(settings);
        let engine = MoodEngine::new(
            Arc::new(MoodStore::new()),
            Arc::new(settings.mood.clone()),
            source,
        );
        info!(
            "[state] Kaori ready: replies via {}, delivering to {}",
            replier.name(),
            channel.name()
        );
        KaoriState { engine, replier, channel, settings }
    }

    /// Swap the engine, e.g. for one with a seeded reaction rng.
    pub fn with_engine(mut self, engine: MoodEngine<SharedSource>) -> Self {
        self.engine = engine;
        self
    }

    pub fn store(&self) -> &Arc<MoodStore> {
        self.engine.store()
    }
}
