// ── Kaori Atoms: Constants ─────────────────────────────────────────────────
// Named constants for the mood engine. Config defaults live here too so the
// loader and the tests agree on them.

// ── Mood vector bounds ─────────────────────────────────────────────────────
pub const MOOD_MIN: f64 = 0.0;
pub const MOOD_MAX: f64 = 1.0;
/// Stored value meaning "no feeling either way".
pub const NEUTRAL: f64 = 0.5;

// ── Sentiment delta bounds ─────────────────────────────────────────────────
pub const STRENGTH_MIN: f64 = -1.0;
pub const STRENGTH_MAX: f64 = 1.0;

// ── Merge rule ─────────────────────────────────────────────────────────────
// multiplier = BASE_MULTIPLIER + (weight / WEIGHT_SCALE) * BASE_MULTIPLIER
// A weight of 0 moves a dimension at most 0.1 per step, a weight of 10 at most 0.2.
pub const BASE_MULTIPLIER: f64 = 0.1;
pub const WEIGHT_SCALE: f64 = 10.0;
/// Weights above this still load, but the loader warns about them.
pub const MAX_EXPECTED_WEIGHT: f64 = 10.0;

// ── Sentiment wire format ──────────────────────────────────────────────────
pub const PAIR_DELIMITER: char = ',';
pub const KEY_VALUE_DELIMITER: char = ':';

// ── Reaction gate ──────────────────────────────────────────────────────────
pub const DEFAULT_REACTION_THRESHOLD: f64 = 0.8;
/// Stored values sit on a 0.01 grid; this absorbs binary float error at the gate.
pub(crate) const GATE_EPSILON: f64 = 1e-9;

// ── Decay ──────────────────────────────────────────────────────────────────
pub const DEFAULT_IDLE_AFTER_SECS: u64 = 1_800;
pub const DEFAULT_DECAY_STEP: f64 = 0.05;
pub const DEFAULT_DECAY_INTERVAL_SECS: u64 = 600;
/// Smaller steps would be erased by two-decimal rounding and never converge.
pub const MIN_DECAY_STEP: f64 = 0.01;
pub const MAX_DECAY_STEP: f64 = 0.5;

// ── Analysis ───────────────────────────────────────────────────────────────
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 20;
/// Stands in for the previous bot utterance before Kaori has said anything.
pub const DEFAULT_NEUTRAL_START: &str = "Neutral start.";
