//! Drops the reference itself and titles the user already rated.

use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;
use catalog::{MediaId, MediaType};
use std::collections::HashSet;

pub struct ReferenceExclusionFilter {
    excluded: HashSet<(MediaType, MediaId)>,
}

impl ReferenceExclusionFilter {
    pub fn new(keys: impl IntoIterator<Item = (MediaType, MediaId)>) -> Self {
        Self {
            excluded: keys.into_iter().collect(),
        }
    }

    /// Also exclude already-rated titles
    pub fn with_rated(mut self, keys: impl IntoIterator<Item = (MediaType, MediaId)>) -> Self {
        self.excluded.extend(keys);
        self
    }
}

impl Filter for ReferenceExclusionFilter {
    fn name(&self) -> &str {
        "ReferenceExclusionFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        _rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| !self.excluded.contains(&c.item.key()))
            .collect())
    }
}
