//! Learning and ranking configuration.
//!
//! Both structs deserialize from partial JSON: omitted fields keep their
//! defaults.

use crate::error::{LearningError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning for weight learning and personalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Largest magnitude any attribute weight may reach
    pub max_weight: f64,
    pub learning_rate: f64,
    /// Weekly decay applied to older feedback
    pub decay_factor: f64,
    /// Feedback needed before preferences affect scores
    pub min_feedback_threshold: u32,
    /// Share of the preference band applied to the final score, in [0, 1]
    pub preference_influence: f64,
    /// Novelty reward and diversity quota, in [0, 1]
    pub exploration_factor: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            max_weight: 5.0,
            learning_rate: 1.0,
            decay_factor: 0.95,
            min_feedback_threshold: 3,
            preference_influence: 0.25,
            exploration_factor: 0.15,
        }
    }
}

impl LearningConfig {
    /// Exploration factor the raw novelty points are calibrated against
    pub const BASELINE_EXPLORATION: f64 = 0.15;

    pub fn validate(&self) -> Result<()> {
        if !(self.max_weight > 0.0) {
            return Err(LearningError::InvalidConfig(format!(
                "max_weight must be positive, got {}",
                self.max_weight
            )));
        }
        if !(self.learning_rate > 0.0) {
            return Err(LearningError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.decay_factor > 0.0 && self.decay_factor <= 1.0) {
            return Err(LearningError::InvalidConfig(format!(
                "decay_factor must be in (0, 1], got {}",
                self.decay_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.preference_influence) {
            return Err(LearningError::InvalidConfig(format!(
                "preference_influence must be in [0, 1], got {}",
                self.preference_influence
            )));
        }
        if !(0.0..=1.0).contains(&self.exploration_factor) {
            return Err(LearningError::InvalidConfig(format!(
                "exploration_factor must be in [0, 1], got {}",
                self.exploration_factor
            )));
        }
        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LearningError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let config: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }
}

/// How the ranked head is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Size of the head the diversity quota is computed against
    pub top_count: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_count: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LearningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_feedback_threshold, 3);
        assert_eq!(RankingConfig::default().top_count, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: LearningConfig = serde_json::from_str(r#"{"exploration_factor": 0.3}"#).unwrap();
        assert_eq!(config.exploration_factor, 0.3);
        assert_eq!(config.max_weight, 5.0);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad = [
            LearningConfig { preference_influence: 1.5, ..Default::default() },
            LearningConfig { exploration_factor: -0.1, ..Default::default() },
            LearningConfig { decay_factor: 0.0, ..Default::default() },
            LearningConfig { max_weight: 0.0, ..Default::default() },
            LearningConfig { learning_rate: f64::NAN, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(LearningError::InvalidConfig(_))));
        }
    }
}
