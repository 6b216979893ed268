// ── Kaori Atoms: Mood Data Types ───────────────────────────────────────────
// The closed dimension set, the stored mood vector, the validated sentiment
// delta, and the conversational context. Plain data with no locking; the
// store in mood/store.rs owns the only shared instance.

use crate::atoms::constants::{MOOD_MAX, MOOD_MIN, NEUTRAL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Dimension ──────────────────────────────────────────────────────────────

/// One named axis of Kaori's affective state.
///
/// Declaration order is the fixed dimension ordering: it breaks ties when
/// picking a dominant dimension and reports the first missing dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Affection,
    Amused,
    Inspired,
    Frustrated,
    Anxious,
    Curious,
}

impl Dimension {
    pub const COUNT: usize = 6;

    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::Affection,
        Dimension::Amused,
        Dimension::Inspired,
        Dimension::Frustrated,
        Dimension::Anxious,
        Dimension::Curious,
    ];

    /// Name as it appears in sentiment responses and config keys.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Affection => "Affection",
            Dimension::Amused => "Amused",
            Dimension::Inspired => "Inspired",
            Dimension::Frustrated => "Frustrated",
            Dimension::Anxious => "Anxious",
            Dimension::Curious => "Curious",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── MoodVector ─────────────────────────────────────────────────────────────

/// Current mood: one value per dimension in `[0.0, 1.0]`, `0.5` is neutral.
///
/// Indexed by `Dimension`, so the key set can never drift from the closed
/// dimension set. `Copy` so the store hands out snapshots, never references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodVector {
    values: [f64; Dimension::COUNT],
}

impl MoodVector {
    /// All dimensions at neutral.
    pub fn neutral() -> Self {
        MoodVector {
            values: [NEUTRAL; Dimension::COUNT],
        }
    }

    /// Returns a copy with `dimension` set to `value`, clamped into range.
    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        self.set(dimension, value);
        self
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.values[dimension.index()]
    }

    pub(crate) fn set(&mut self, dimension: Dimension, value: f64) {
        self.values[dimension.index()] = value.clamp(MOOD_MIN, MOOD_MAX);
    }

    /// `(dimension, value)` pairs in the fixed dimension ordering.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn is_neutral(&self) -> bool {
        self.values.iter().all(|v| *v == NEUTRAL)
    }
}

impl Default for MoodVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for MoodVector {
    /// `Affection: 0.50, Amused: 0.50, …` — the form fed into prompts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (dim, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:.2}", dim, value)?;
        }
        Ok(())
    }
}

// ── SentimentDelta ─────────────────────────────────────────────────────────

/// One analysis pass's signed strength per dimension, each in `[-1.0, 1.0]`.
/// Only the validator constructs these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentDelta {
    strengths: [f64; Dimension::COUNT],
}

impl SentimentDelta {
    pub(crate) fn from_strengths(strengths: [f64; Dimension::COUNT]) -> Self {
        SentimentDelta { strengths }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.strengths[dimension.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

// ── Reactions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// The dominant dimension sits above neutral.
    Positive,
    /// The dominant dimension sits below neutral; the opposite table is used.
    Negative,
}

/// A discrete emoji reaction and the mood reading that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub dimension: Dimension,
    pub polarity: Polarity,
    pub symbol: String,
}

// ── ConversationContext ────────────────────────────────────────────────────

/// Last thing Kaori said and when the conversation last moved.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContext {
    pub last_text: String,
    pub last_interaction: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(last_text: impl Into<String>, last_interaction: DateTime<Utc>) -> Self {
        ConversationContext {
            last_text: last_text.into(),
            last_interaction,
        }
    }

    /// Empty text, clock starting at `at`.
    pub fn fresh(at: DateTime<Utc>) -> Self {
        Self::new(String::new(), at)
    }
}
