//! Minimum mass appeal and production scale.

use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;

/// Keeps candidates at or above both the mass-appeal and production thresholds
pub struct MassAppealFilter;

impl Filter for MassAppealFilter {
    fn name(&self) -> &str {
        "MassAppealFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| {
                c.profile.mass_appeal_score >= rules.min_mass_appeal
                    && c.profile.production_scale >= rules.min_production_scale
            })
            .collect())
    }
}
