//! Weight recomputation from the feedback history.
//!
//! ## Algorithm
//! For every like/dislike record:
//! 1. `recency = decay_factor ^ (age_days / 7)`
//! 2. `delta = direction × learning_rate × recency`
//! 3. Add `delta` to every distinct attribute key the title touches
//!
//! Finally clamp each weight to `[-max_weight, max_weight]`. Sums are not
//! normalized, so repeated feedback on the same attribute compounds.
//!
//! Weights are always rebuilt from scratch and are a pure function of the
//! history and `now`.

use crate::config::LearningConfig;
use crate::types::{AttributeKey, UserFeedback};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub type AttributeWeights = BTreeMap<AttributeKey, f64>;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Decay multiplier for a record of the given age; future timestamps count as now
pub fn recency_multiplier(timestamp: DateTime<Utc>, now: DateTime<Utc>, decay_factor: f64) -> f64 {
    let age_days = ((now - timestamp).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
    decay_factor.powf(age_days / 7.0)
}

/// Rebuild all weights from `history` as of `now`
pub fn recompute_weights(
    history: &[UserFeedback],
    config: &LearningConfig,
    now: DateTime<Utc>,
) -> AttributeWeights {
    let mut weights = AttributeWeights::new();

    for record in history {
        let direction = record.feedback.direction();
        if direction == 0.0 {
            continue;
        }
        let recency = recency_multiplier(record.timestamp, now, config.decay_factor);
        let delta = direction * config.learning_rate * recency;

        for key in record.attributes.keys() {
            *weights.entry(key).or_insert(0.0) += delta;
        }
    }

    for weight in weights.values_mut() {
        *weight = weight.clamp(-config.max_weight, config.max_weight);
    }
    weights
}
