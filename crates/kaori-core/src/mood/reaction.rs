// Reaction selector — mood vector → optional emoji.
//
// Reactions are a rare, salient signal: only a dimension at or past the
// threshold produces one. Two readings of "dominant" are supported:
//
//   RawValue            — the dimension with the largest stored value; its
//                         magnitude is compared with the threshold. Since
//                         stored values are never negative, only the
//                         positive table can fire. This is the observed
//                         behaviour and the default.
//   DistanceFromNeutral — the dimension furthest from 0.5; the side of
//                         neutral picks the table, and the excursion must
//                         reach `threshold - 0.5` (0.8 ↔ 0.2 by default).

use crate::atoms::constants::{GATE_EPSILON, NEUTRAL};
use crate::atoms::error::{MoodError, MoodResult};
use crate::atoms::types::{Dimension, MoodVector, Polarity, Reaction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::BTreeMap;

// ── Policy ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DominanceRule {
    #[default]
    #[serde(rename = "raw")]
    RawValue,
    #[serde(rename = "distance")]
    DistanceFromNeutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionPolicy {
    pub threshold: f64,
    pub dominance: DominanceRule,
}

// ── Tables ─────────────────────────────────────────────────────────────────

const POSITIVE_DEFAULTS: [&[&str]; Dimension::COUNT] = [
    &["💖", "🥰", "😘"],
    &["😂", "🤣"],
    &["✨", "💡"],
    &["😤", "😡"],
    &["😨", "🥺"],
    &["🤔", "👀", "🧐"],
];

const NEGATIVE_DEFAULTS: [&[&str]; Dimension::COUNT] = [
    &["💔", "😠"],
    &["🙄", "😑"],
    &["😞", "🙃"],
    &["😌", "🤗"],
    &["😎", "😃"],
    &["😴", "😕"],
];

/// Candidate symbols per dimension for each polarity. Read-only after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionTables {
    positive: [Vec<String>; Dimension::COUNT],
    negative: [Vec<String>; Dimension::COUNT],
}

impl Default for ReactionTables {
    fn default() -> Self {
        let owned = |table: &[&[&str]; Dimension::COUNT]| -> [Vec<String>; Dimension::COUNT] {
            std::array::from_fn(|i| table[i].iter().map(|s| s.to_string()).collect())
        };
        ReactionTables {
            positive: owned(&POSITIVE_DEFAULTS),
            negative: owned(&NEGATIVE_DEFAULTS),
        }
    }
}

impl ReactionTables {
    /// Defaults with per-dimension replacements from `[reaction.positive]`
    /// and `[reaction.negative]`. Unknown names and empty lists are rejected.
    pub fn with_overrides(
        positive: &BTreeMap<String, Vec<String>>,
        negative: &BTreeMap<String, Vec<String>>,
    ) -> MoodResult<Self> {
        let mut tables = Self::default();
        for (section, overrides, target) in [
            ("positive", positive, &mut tables.positive),
            ("negative", negative, &mut tables.negative),
        ] {
            for (name, symbols) in overrides {
                let dim = Dimension::from_name(name).ok_or_else(|| {
                    MoodError::config(format!("[reaction.{}] has unknown dimension '{}'", section, name))
                })?;
                if symbols.iter().all(|s| s.trim().is_empty()) {
                    return Err(MoodError::config(format!(
                        "[reaction.{}] needs at least one symbol for '{}'",
                        section, name
                    )));
                }
                target[dim.index()] = symbols
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
        Ok(tables)
    }

    pub fn candidates(&self, dimension: Dimension, polarity: Polarity) -> &[String] {
        match polarity {
            Polarity::Positive => &self.positive[dimension.index()],
            Polarity::Negative => &self.negative[dimension.index()],
        }
    }
}

// ── Random source ──────────────────────────────────────────────────────────

/// Picks one candidate index. Injected so tests can pin the choice.
pub trait ReactionRng: Send {
    /// Index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Default source backed by `StdRng`.
pub struct StdReactionRng(StdRng);

impl StdReactionRng {
    pub fn from_entropy() -> Self {
        StdReactionRng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        StdReactionRng(StdRng::seed_from_u64(seed))
    }
}

impl ReactionRng for StdReactionRng {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

// ── Selection ──────────────────────────────────────────────────────────────

/// Dominant dimension under `rule`, with its stored value and the magnitude
/// the gate is checked against. Ties go to the earlier dimension.
pub fn dominant(vector: &MoodVector, rule: DominanceRule) -> (Dimension, f64, f64) {
    let score = |value: f64| match rule {
        DominanceRule::RawValue => value,
        DominanceRule::DistanceFromNeutral => (value - NEUTRAL).abs(),
    };

    let mut best = (Dimension::ALL[0], vector.get(Dimension::ALL[0]));
    for (dim, value) in vector.iter().skip(1) {
        if score(value) > score(best.1) {
            best = (dim, value);
        }
    }

    let (dim, value) = best;
    let magnitude = match rule {
        DominanceRule::RawValue => value.abs(),
        DominanceRule::DistanceFromNeutral => (value - NEUTRAL).abs(),
    };
    (dim, value, magnitude)
}

/// Reaction for `vector`, or `None` when nothing is strong enough.
pub fn select(
    vector: &MoodVector,
    policy: &ReactionPolicy,
    tables: &ReactionTables,
    rng: &mut dyn ReactionRng,
) -> Option<Reaction> {
    let (dimension, value, magnitude) = dominant(vector, policy.dominance);

    let gate = match policy.dominance {
        DominanceRule::RawValue => policy.threshold,
        DominanceRule::DistanceFromNeutral => policy.threshold - NEUTRAL,
    };
    if magnitude + GATE_EPSILON < gate {
        return None;
    }

    let polarity = if value >= NEUTRAL {
        Polarity::Positive
    } else {
        Polarity::Negative
    };
    let candidates = tables.candidates(dimension, polarity);
    if candidates.is_empty() {
        return None;
    }
    let symbol = candidates.get(rng.pick(candidates.len()))?.clone();

    Some(Reaction {
        dimension,
        polarity,
        symbol,
    })
}
