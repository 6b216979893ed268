// Mood configuration — the `[nature]`, `[decay]`, `[reaction]` and
// `[analysis]` tables of `config.toml`.
//
// `MoodConfig` is the raw serde shape; `MoodSettings::from_config` checks it
// once at startup and is the only way to get settings the engine accepts.
// Every failure here is a `MoodError::Config` and should stop the process.

use crate::atoms::constants::*;
use crate::atoms::error::{MoodError, MoodResult};
use crate::mood::decay::DecayConfig;
use crate::mood::reaction::{DominanceRule, ReactionPolicy, ReactionTables};
use crate::mood::updater::SensitivityWeights;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

// ── Raw TOML shape ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MoodConfig {
    /// Sensitivity weight per dimension. Required, no defaults.
    pub nature: BTreeMap<String, f64>,
    #[serde(default)]
    pub decay: DecayTable,
    #[serde(default)]
    pub reaction: ReactionTable,
    #[serde(default)]
    pub analysis: AnalysisTable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecayTable {
    pub idle_after_secs: u64,
    pub step: f64,
    pub interval_secs: u64,
}

impl Default for DecayTable {
    fn default() -> Self {
        DecayTable {
            idle_after_secs: DEFAULT_IDLE_AFTER_SECS,
            step: DEFAULT_DECAY_STEP,
            interval_secs: DEFAULT_DECAY_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReactionTable {
    pub threshold: f64,
    pub dominance: DominanceRule,
    pub positive: BTreeMap<String, Vec<String>>,
    pub negative: BTreeMap<String, Vec<String>>,
}

impl Default for ReactionTable {
    fn default() -> Self {
        ReactionTable {
            threshold: DEFAULT_REACTION_THRESHOLD,
            dominance: DominanceRule::default(),
            positive: BTreeMap::new(),
            negative: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisTable {
    pub timeout_secs: u64,
    pub neutral_start: String,
}

impl Default for AnalysisTable {
    fn default() -> Self {
        AnalysisTable {
            timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
            neutral_start: DEFAULT_NEUTRAL_START.to_string(),
        }
    }
}

impl MoodConfig {
    /// Parse a TOML document containing at least a `[nature]` table.
    pub fn from_toml(content: &str) -> MoodResult<Self> {
        toml::from_str::<MoodConfig>(content)
            .map_err(|e| MoodError::config(format!("TOML parse error: {e}")))
    }
}

// ── Validated settings ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub timeout: Duration,
    pub neutral_start: String,
}

/// Everything the engine needs, checked and immutable.
#[derive(Debug, Clone)]
pub struct MoodSettings {
    pub weights: SensitivityWeights,
    pub decay: DecayConfig,
    /// How often the scheduler should run decay.
    pub decay_interval: Duration,
    pub policy: ReactionPolicy,
    pub tables: ReactionTables,
    pub analysis: AnalysisSettings,
}

impl MoodSettings {
    pub fn from_config(config: &MoodConfig) -> MoodResult<Self> {
        let weights = SensitivityWeights::from_table(&config.nature)?;

        let step = config.decay.step;
        if !(MIN_DECAY_STEP..=MAX_DECAY_STEP).contains(&step) {
            return Err(MoodError::config(format!(
                "[decay] step must be between {} and {}, got {}",
                MIN_DECAY_STEP, MAX_DECAY_STEP, step
            )));
        }
        if config.decay.interval_secs == 0 {
            return Err(MoodError::config("[decay] interval_secs must be greater than 0"));
        }

        let threshold = config.reaction.threshold;
        if !(threshold > NEUTRAL && threshold <= MOOD_MAX) {
            return Err(MoodError::config(format!(
                "[reaction] threshold must be in (0.5, 1.0], got {}",
                threshold
            )));
        }
        let tables =
            ReactionTables::with_overrides(&config.reaction.positive, &config.reaction.negative)?;

        if config.analysis.timeout_secs == 0 {
            return Err(MoodError::config("[analysis] timeout_secs must be greater than 0"));
        }
        let neutral_start = match config.analysis.neutral_start.trim() {
            "" => DEFAULT_NEUTRAL_START.to_string(),
            s => s.to_string(),
        };

        Ok(MoodSettings {
            weights,
            decay: DecayConfig {
                idle_after: Duration::from_secs(config.decay.idle_after_secs),
                step,
            },
            decay_interval: Duration::from_secs(config.decay.interval_secs),
            policy: ReactionPolicy {
                threshold,
                dominance: config.reaction.dominance,
            },
            tables,
            analysis: AnalysisSettings {
                timeout: Duration::from_secs(config.analysis.timeout_secs),
                neutral_start,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{Dimension, Polarity};

    const NATURE: &str = r#"
[nature]
Affection = 7
Amused = 5
Inspired = 6
Frustrated = 4
Anxious = 3
Curious = 6.5
"#;

    fn settings(extra: &str) -> MoodResult<MoodSettings> {
        MoodSettings::from_config(&MoodConfig::from_toml(&format!("{NATURE}{extra}"))?)
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let s = settings("").unwrap();
        assert_eq!(s.weights.get(Dimension::Affection), 7.0);
        assert_eq!(s.weights.get(Dimension::Curious), 6.5);
        assert_eq!(s.decay.idle_after, Duration::from_secs(DEFAULT_IDLE_AFTER_SECS));
        assert_eq!(s.decay.step, DEFAULT_DECAY_STEP);
        assert_eq!(s.policy.threshold, 0.8);
        assert_eq!(s.policy.dominance, DominanceRule::RawValue);
        assert_eq!(s.analysis.neutral_start, "Neutral start.");
        assert_eq!(s.tables, ReactionTables::default());
    }

    #[test]
    fn full_config_is_applied() {
        let s = settings(
            r#"
[decay]
idle_after_secs = 120
step = 0.1
interval_secs = 30

[reaction]
threshold = 0.9
dominance = "distance"

[reaction.negative]
Curious = ["🥱"]

[analysis]
timeout_secs = 5
neutral_start = "Hi."
"#,
        )
        .unwrap();
        assert_eq!(s.decay.idle_after, Duration::from_secs(120));
        assert_eq!(s.decay_interval, Duration::from_secs(30));
        assert_eq!(s.policy.dominance, DominanceRule::DistanceFromNeutral);
        assert_eq!(s.policy.threshold, 0.9);
        assert_eq!(s.tables.candidates(Dimension::Curious, Polarity::Negative), ["🥱".to_string()]);
        assert_eq!(s.analysis.timeout, Duration::from_secs(5));
        assert_eq!(s.analysis.neutral_start, "Hi.");
    }

    #[test]
    fn missing_nature_table_is_fatal() {
        let err = MoodConfig::from_toml("[decay]\nstep = 0.1\n").unwrap_err();
        assert!(matches!(err, MoodError::Config(ref m) if m.contains("nature")), "{err}");
    }

    #[test]
    fn missing_weight_is_fatal() {
        let cfg = MoodConfig::from_toml("[nature]\nAffection = 1\nAmused = 1\n").unwrap();
        let err = MoodSettings::from_config(&cfg).unwrap_err();
        assert!(matches!(err, MoodError::Config(ref m) if m.contains("Inspired")), "{err}");
    }

    #[test]
    fn tiny_decay_step_is_rejected() {
        assert!(settings("[decay]\nstep = 0.001\n").is_err());
    }

    #[test]
    fn threshold_at_or_below_neutral_is_rejected() {
        assert!(settings("[reaction]\nthreshold = 0.5\n").is_err());
        assert!(settings("[reaction]\nthreshold = 1.2\n").is_err());
    }

    #[test]
    fn unknown_dominance_rule_is_rejected() {
        assert!(settings("[reaction]\ndominance = \"loudest\"\n").is_err());
    }

    #[test]
    fn blank_neutral_start_falls_back() {
        let s = settings("[analysis]\nneutral_start = \"  \"\n").unwrap();
        assert_eq!(s.analysis.neutral_start, DEFAULT_NEUTRAL_START);
    }
}
