//! Requires at least one of the reference's core themes.

use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;

/// No-op when the rules require no themes
pub struct ThemeFilter;

impl Filter for ThemeFilter {
    fn name(&self) -> &str {
        "ThemeFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        if rules.required_themes.is_empty() {
            return Ok(candidates);
        }
        Ok(candidates
            .into_iter()
            .filter(|c| rules.required_themes.iter().any(|t| c.profile.has_theme(*t)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{candidate, rules_for};
    use crate::types::ThematicTag;
    use catalog::genres;

    #[test]
    fn test_requires_shared_core_theme() {
        let reference = candidate(1, "te", "IN", vec![genres::ACTION], 9_000, "A smuggler seeks revenge.");
        let rules = rules_for(&reference);
        assert!(rules.required_themes.contains(&ThematicTag::Revenge));

        let candidates = vec![
            candidate(2, "te", "IN", vec![genres::ACTION], 9_000, "Vengeance for a fallen brother."),
            candidate(3, "te", "IN", vec![genres::ACTION], 9_000, "A road trip."),
        ];
        let kept = ThemeFilter.apply(candidates, &rules).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].item.id, 2);
    }

    #[test]
    fn test_no_required_themes_keeps_all() {
        let reference = candidate(1, "en", "US", vec![genres::COMEDY], 900, "");
        let rules = rules_for(&reference);
        assert!(rules.required_themes.is_empty());

        let candidates = vec![candidate(2, "en", "US", vec![genres::COMEDY], 900, "")];
        assert_eq!(ThemeFilter.apply(candidates, &rules).unwrap().len(), 1);
    }
}
