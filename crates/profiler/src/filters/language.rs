//! Hard language and country rules.

use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;

pub struct LanguageFilter;

impl Filter for LanguageFilter {
    fn name(&self) -> &str {
        "LanguageFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| rules.allows_language(&c.culture.language, &c.culture.countries))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{candidate, rules_for};
    use catalog::genres;

    #[test]
    fn test_regional_reference_drops_english_productions() {
        let reference = candidate(1, "ta", "IN", vec![genres::DRAMA], 800, "");
        let rules = rules_for(&reference);

        let candidates = vec![
            candidate(2, "ta", "IN", vec![genres::DRAMA], 800, ""),
            candidate(3, "en", "US", vec![genres::DRAMA], 800, ""),
            candidate(4, "te", "IN", vec![genres::DRAMA], 800, ""),
        ];
        let kept = LanguageFilter.apply(candidates, &rules).unwrap();

        let ids: Vec<_> = kept.iter().map(|c| c.item.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_open_policy_keeps_everything() {
        let reference = candidate(1, "en", "US", vec![genres::ACTION], 30_000, "");
        let rules = rules_for(&reference);

        let candidates = vec![
            candidate(2, "ko", "KR", vec![genres::ACTION], 800, ""),
            candidate(3, "en", "GB", vec![genres::ACTION], 800, ""),
        ];
        assert_eq!(LanguageFilter.apply(candidates, &rules).unwrap().len(), 2);
    }
}
