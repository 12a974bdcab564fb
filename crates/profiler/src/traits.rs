//! Core trait for the cultural filter pipeline.

use crate::rules::CulturalFilterRules;
use crate::types::ProfiledCandidate;
use anyhow::Result;

/// A composable filter over profiled candidates.
///
/// All filters must implement this trait to be used in the
/// [`FilterPipeline`](crate::filter_pipeline::FilterPipeline).
///
/// ## Design Note
/// - `Send + Sync` lets one pipeline serve concurrent requests
/// - Filters take ownership of the candidate list and return what survives,
///   so a chain of filters never clones candidates
/// - Filters only read the rules; era is never filtered on
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The profiled candidates to filter (takes ownership)
    /// * `rules` - Rules generated from the reference's profile
    ///
    /// # Returns
    /// * `Ok(Vec<ProfiledCandidate>)` - The candidates that pass, in input order
    /// * `Err` - If filtering fails
    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>>;
}
