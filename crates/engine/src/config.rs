//! Engine configuration.
//!
//! A settings file holds an optional `engine` and `learning` section; any
//! field left out keeps its default:
//!
//! ```json
//! { "engine": { "candidate_limit": 30 }, "learning": { "exploration_factor": 0.2 } }
//! ```

use anyhow::{Context, Result, bail};
use learning::{LearningConfig, RankingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recommendations returned after ranking
    pub candidate_limit: usize,
    /// Head size the diversity quota is computed against
    pub top_count: usize,
    /// Search pages read per media type while resolving
    pub search_pages: u32,
    /// Below this many strict matches the relaxed filter chain is used
    pub min_strict_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 20,
            top_count: RankingConfig::default().top_count,
            search_pages: 1,
            min_strict_results: 5,
        }
    }
}

impl EngineConfig {
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig {
            top_count: self.top_count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_limit == 0 {
            bail!("candidate_limit must be at least 1");
        }
        if self.search_pages == 0 {
            bail!("search_pages must be at least 1");
        }
        Ok(())
    }
}

/// Everything a settings file can override
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub learning: LearningConfig,
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Malformed settings file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.learning.validate().context("Invalid learning section")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings() {
        let settings: Settings =
            serde_json::from_str(r#"{"engine": {"candidate_limit": 7}, "learning": {"max_weight": 3.0}}"#).unwrap();
        assert_eq!(settings.engine.candidate_limit, 7);
        assert_eq!(settings.engine.top_count, 10);
        assert_eq!(settings.learning.max_weight, 3.0);
        assert_eq!(settings.learning.min_feedback_threshold, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_sections_rejected() {
        let bad_engine: Settings = serde_json::from_str(r#"{"engine": {"search_pages": 0}}"#).unwrap();
        assert!(bad_engine.validate().is_err());

        let bad_learning: Settings = serde_json::from_str(r#"{"learning": {"preference_influence": 2.0}}"#).unwrap();
        assert!(bad_learning.validate().is_err());
    }
}
