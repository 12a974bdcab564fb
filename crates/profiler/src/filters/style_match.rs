//! Narrative scale, storytelling style and audience must fall in the
//! reference's allowed sets.

use crate::rules::CulturalFilterRules;
use crate::traits::Filter;
use crate::types::ProfiledCandidate;
use anyhow::Result;

pub struct StyleMatchFilter;

impl Filter for StyleMatchFilter {
    fn name(&self) -> &str {
        "StyleMatchFilter"
    }

    fn apply(
        &self,
        candidates: Vec<ProfiledCandidate>,
        rules: &CulturalFilterRules,
    ) -> Result<Vec<ProfiledCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|c| {
                rules.required_narrative_scales.contains(&c.profile.narrative_scale)
                    && rules.required_styles.contains(&c.profile.storytelling_style)
                    && rules.required_audiences.contains(&c.profile.audience_type)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::fixtures::{candidate, rules_for};
    use crate::types::StorytellingStyle;
    use catalog::genres;

    #[test]
    fn test_action_reference_drops_comedy() {
        let reference = candidate(1, "en", "US", vec![genres::ACTION], 12_000, "");
        let rules = rules_for(&reference);
        assert_eq!(reference.profile.storytelling_style, StorytellingStyle::ActionSpectacle);

        let candidates = vec![
            candidate(2, "en", "US", vec![genres::ACTION, genres::ADVENTURE], 11_000, ""),
            candidate(3, "en", "US", vec![genres::COMEDY], 11_000, ""),
        ];
        let kept = StyleMatchFilter.apply(candidates, &rules).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].item.id, 2);
    }
}
