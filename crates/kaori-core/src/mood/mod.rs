// ── Kaori Mood ─────────────────────────────────────────────────────────────
// Leaf-first: parser → validator → updater → store, with reaction selection
// and decay reading the same vector.

pub mod decay;
pub mod parser;
pub mod reaction;
pub mod store;
pub mod updater;
pub mod validator;

pub use decay::{decay_vector, DecayConfig, DecayOutcome};
pub use parser::{parse, RawSentiment};
pub use reaction::{dominant, select, DominanceRule, ReactionPolicy, ReactionRng, ReactionTables, StdReactionRng};
pub use store::{MoodSnapshot, MoodStore};
pub use updater::{merge, SensitivityWeights};
pub use validator::validate;
