//! Chains filters over profiled candidates.
//!
//! Two presets exist. The strict chain applies every rule generated from the
//! reference; the relaxed chain keeps only the rules that must hold even when
//! too few titles survive the strict one.

use crate::filters::{
    LanguageFilter, MassAppealFilter, ReferenceExclusionFilter, StyleMatchFilter, ThemeFilter,
};
use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;

/// Applies filters in the order they were added.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ReferenceExclusionFilter::new([reference.key()]))
///     .add_filter(LanguageFilter)
///     .add_filter(MassAppealFilter);
///
/// let matches = pipeline.apply(profiled, &rules)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern)
    ///
    /// # Arguments
    /// * `filter` - Appended after every filter already added
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Every cultural rule: exclusion, language, mass appeal, style, themes
    ///
    /// # Arguments
    /// * `exclusion` - Drops the reference itself and already rated titles
    pub fn strict(exclusion: ReferenceExclusionFilter) -> Self {
        Self::new()
            .add_filter(exclusion)
            .add_filter(LanguageFilter)
            .add_filter(MassAppealFilter)
            .add_filter(StyleMatchFilter)
            .add_filter(ThemeFilter)
    }

    /// Only the hard rules that must never be relaxed: exclusion and language
    pub fn relaxed(exclusion: ReferenceExclusionFilter) -> Self {
        Self::new().add_filter(exclusion).add_filter(LanguageFilter)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence.
    ///
    /// # Arguments
    /// * `candidates` - Profiled candidates (takes ownership)
    /// * `rules` - Rules generated from the reference's profile
    ///
    /// # Returns
    /// * `Ok(Vec<ProfiledCandidate>)` - Candidates that passed every filter, in input order
    /// * `Err` - The first filter error; later filters are not run
    pub fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, rules)?;
            tracing::debug!(
                "Filter {} kept {} of {} candidates",
                filter.name(),
                current.len(),
                before
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
