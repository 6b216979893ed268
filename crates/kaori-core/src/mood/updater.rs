// Mood updater — weighted merge of a validated delta into the mood vector.
//
//   multiplier = 0.1 + (weight / 10) * 0.1
//   value      = round2(clamp(value + strength * multiplier, 0.0, 1.0))
//
// The multiplier caps a single step at 0.1–0.2 of the delta's strength so
// one response cannot saturate a dimension. Two-decimal rounding keeps the
// vector on a 0.01 grid and stops float drift over long sessions.

use crate::atoms::constants::{BASE_MULTIPLIER, MAX_EXPECTED_WEIGHT, MOOD_MAX, MOOD_MIN, WEIGHT_SCALE};
use crate::atoms::error::{MoodError, MoodResult};
use crate::atoms::types::{Dimension, MoodVector, SentimentDelta};
use log::warn;
use std::collections::BTreeMap;

/// Per-dimension sensitivity, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityWeights {
    weights: [f64; Dimension::COUNT],
}

impl SensitivityWeights {
    /// Build from the `[nature]` config table.
    ///
    /// Every dimension must be present and no other key may appear; a weight
    /// must be finite and non-negative. Any violation is a `Config` error.
    pub fn from_table(table: &BTreeMap<String, f64>) -> MoodResult<Self> {
        if let Some(unknown) = table.keys().find(|k| Dimension::from_name(k).is_none()) {
            return Err(MoodError::config(format!(
                "[nature] has unknown dimension '{}'",
                unknown
            )));
        }

        let mut weights = [0.0; Dimension::COUNT];
        for dim in Dimension::ALL {
            let weight = *table.get(dim.name()).ok_or_else(|| {
                MoodError::config(format!("[nature] is missing a weight for '{}'", dim))
            })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(MoodError::config(format!(
                    "[nature] weight for '{}' must be a non-negative number, got {}",
                    dim, weight
                )));
            }
            if weight > MAX_EXPECTED_WEIGHT {
                warn!(
                    "[mood] Weight {} for {} is above {}; steps will exceed 0.2",
                    weight, dim, MAX_EXPECTED_WEIGHT
                );
            }
            weights[dim.index()] = weight;
        }

        Ok(SensitivityWeights { weights })
    }

    /// Same weight for every dimension.
    pub fn uniform(weight: f64) -> Self {
        SensitivityWeights {
            weights: [weight; Dimension::COUNT],
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.weights[dimension.index()]
    }

    /// Scale applied to a delta's strength for `dimension`.
    pub fn multiplier(&self, dimension: Dimension) -> f64 {
        BASE_MULTIPLIER + (self.get(dimension) / WEIGHT_SCALE) * BASE_MULTIPLIER
    }
}

/// Apply `delta` to every dimension of `vector`.
///
/// Callers hold the store's write lock for the whole call, so the merge is
/// observed either completely or not at all.
pub fn merge(vector: &mut MoodVector, delta: &SentimentDelta, weights: &SensitivityWeights) {
    for (dim, strength) in delta.iter() {
        let moved = vector.get(dim) + strength * weights.multiplier(dim);
        vector.set(dim, round2(moved.clamp(MOOD_MIN, MOOD_MAX)));
    }
}

/// Round half away from zero to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
