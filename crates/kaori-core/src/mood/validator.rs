// Sentiment validator — RawSentiment → SentimentDelta.
//
// The key set must be exactly the dimension set and every strength must lie
// in [-1.0, 1.0]. The first offender is reported; nothing is returned on
// failure, so a rejected response can never leak into the store.

use super::parser::RawSentiment;
use crate::atoms::constants::{STRENGTH_MAX, STRENGTH_MIN};
use crate::atoms::error::SentimentValidationError;
use crate::atoms::types::{Dimension, SentimentDelta};

pub fn validate(raw: &RawSentiment) -> Result<SentimentDelta, SentimentValidationError> {
    let mut strengths = [0.0; Dimension::COUNT];
    let mut seen = [false; Dimension::COUNT];

    for (name, value) in raw.iter() {
        let dimension = Dimension::from_name(name)
            .ok_or_else(|| SentimentValidationError::UnknownDimension(name.to_string()))?;

        if seen[dimension.index()] {
            return Err(SentimentValidationError::DuplicateDimension(dimension));
        }
        // NaN fails `contains`, so it is reported as out of range.
        if !(STRENGTH_MIN..=STRENGTH_MAX).contains(&value) {
            return Err(SentimentValidationError::OutOfRange { dimension, value });
        }

        seen[dimension.index()] = true;
        strengths[dimension.index()] = value;
    }

    if let Some(missing) = Dimension::ALL.into_iter().find(|d| !seen[d.index()]) {
        return Err(SentimentValidationError::MissingDimension(missing));
    }

    Ok(SentimentDelta::from_strengths(strengths))
}
