// Sentiment parser — raw model text → ordered `name → strength` pairs.
//
// Pure function, no state. The model is asked for `Tone:strength` pairs
// separated by commas; nothing about ordering or whitespace is guaranteed,
// so both sides of every pair are trimmed. Dimension names are not checked
// here: that is the validator's job.

use crate::atoms::constants::{KEY_VALUE_DELIMITER, PAIR_DELIMITER};
use crate::atoms::error::{MoodError, MoodResult};
use std::fmt;

/// Parsed but unvalidated sentiment, in the order the model wrote it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSentiment {
    pairs: Vec<(String, f64)>,
}

impl RawSentiment {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.pairs.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for RawSentiment {
    /// Re-serializes in the wire format, so `parse(&raw.to_string())` is `raw`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, "{} ", PAIR_DELIMITER)?;
            }
            write!(f, "{}{}{}", name, KEY_VALUE_DELIMITER, value)?;
        }
        Ok(())
    }
}

/// Parse a `Name:value, Name:value, …` response.
///
/// All-or-nothing: an empty input, a pair without `:`, an empty name or a
/// non-numeric value fails the whole parse with `MalformedSentiment`.
pub fn parse(raw: &str) -> MoodResult<RawSentiment> {
    if raw.trim().is_empty() {
        return Err(MoodError::malformed("empty sentiment response"));
    }

    let mut pairs = Vec::new();
    for (i, pair) in raw.split(PAIR_DELIMITER).enumerate() {
        let (name, value) = pair.split_once(KEY_VALUE_DELIMITER).ok_or_else(|| {
            MoodError::malformed(format!(
                "pair {} ('{}') has no '{}'",
                i + 1,
                pair.trim(),
                KEY_VALUE_DELIMITER
            ))
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(MoodError::malformed(format!("pair {} has an empty name", i + 1)));
        }

        let value = value.trim();
        let strength = value.parse::<f64>().map_err(|_| {
            MoodError::malformed(format!("value '{}' for '{}' is not a number", value, name))
        })?;

        pairs.push((name.to_string(), strength));
    }

    Ok(RawSentiment { pairs })
}
