// Mood decay ("balance") — relax every dimension toward neutral after a
// period without interaction.
//
// Pure: the result depends only on the vector, the config and how long the
// conversation has been idle. The store calls this under its write lock.

use super::updater::round2;
use crate::atoms::constants::NEUTRAL;
use crate::atoms::types::{Dimension, MoodVector};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    /// Idle time that must be exceeded before decay applies.
    pub idle_after: Duration,
    /// Fixed move toward 0.5 per application.
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayOutcome {
    /// The conversation was active recently; nothing changed.
    NotIdle,
    /// Decay ran; `moved` dimensions changed value.
    Relaxed { moved: usize },
}

/// Move every dimension `config.step` toward neutral if `idle` exceeds
/// `config.idle_after`. Never overshoots 0.5.
pub fn decay_vector(vector: &mut MoodVector, config: &DecayConfig, idle: Duration) -> DecayOutcome {
    if idle <= config.idle_after {
        return DecayOutcome::NotIdle;
    }

    let mut moved = 0;
    for dim in Dimension::ALL {
        let current = vector.get(dim);
        let relaxed = if current > NEUTRAL {
            (current - config.step).max(NEUTRAL)
        } else {
            (current + config.step).min(NEUTRAL)
        };
        let relaxed = round2(relaxed);
        if relaxed != current {
            vector.set(dim, relaxed);
            moved += 1;
        }
    }
    DecayOutcome::Relaxed { moved }
}
