//! Reference similarity scoring.
//!
//! Produces the 0-100 "external" score personalization starts from. Each
//! component is a ratio in `[0, 1]` multiplied by its weight; the weights
//! sum to 100.

use profiler::{CinematicProfile, CulturalFilterRules, ProfiledCandidate};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

const GENRE_WEIGHT: f64 = 25.0;
const SCALE_WEIGHT: f64 = 10.0;
const STYLE_WEIGHT: f64 = 15.0;
const AUDIENCE_WEIGHT: f64 = 10.0;
const THEME_WEIGHT: f64 = 15.0;
const ERA_WEIGHT: f64 = 10.0;
const MASS_APPEAL_WEIGHT: f64 = 10.0;
const LANGUAGE_WEIGHT: f64 = 5.0;

/// Per-component breakdown of a similarity score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    pub genre_overlap: f64,
    pub narrative_scale: f64,
    pub storytelling_style: f64,
    pub audience: f64,
    pub theme_overlap: f64,
    pub era: f64,
    pub mass_appeal: f64,
    pub language: f64,
}

impl SimilarityBreakdown {
    /// Weighted total in `[0, 100]`
    pub fn total(&self) -> f64 {
        let total = self.genre_overlap * GENRE_WEIGHT
            + self.narrative_scale * SCALE_WEIGHT
            + self.storytelling_style * STYLE_WEIGHT
            + self.audience * AUDIENCE_WEIGHT
            + self.theme_overlap * THEME_WEIGHT
            + self.era * ERA_WEIGHT
            + self.mass_appeal * MASS_APPEAL_WEIGHT
            + self.language * LANGUAGE_WEIGHT;
        total.clamp(0.0, 100.0)
    }
}

/// Scores candidates against one reference
pub struct SimilarityScorer<'a> {
    reference_genres: HashSet<u32>,
    profile: &'a CinematicProfile,
    rules: &'a CulturalFilterRules,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(reference: &'a ProfiledCandidate, rules: &'a CulturalFilterRules) -> Self {
        Self {
            reference_genres: reference.item.genre_ids.iter().copied().collect(),
            profile: &reference.profile,
            rules,
        }
    }

    /// Score all candidates in parallel, in input order
    pub fn score_all(&self, candidates: &[ProfiledCandidate]) -> Vec<SimilarityBreakdown> {
        candidates
            .par_iter()
            .map(|candidate| self.score_single(candidate))
            .collect()
    }

    pub fn score_single(&self, candidate: &ProfiledCandidate) -> SimilarityBreakdown {
        let profile = &candidate.profile;

        SimilarityBreakdown {
            genre_overlap: self.genre_overlap(&candidate.item.genre_ids),
            narrative_scale: match_ratio(profile.narrative_scale == self.profile.narrative_scale),
            storytelling_style: if profile.storytelling_style == self.profile.storytelling_style {
                1.0
            } else if self.rules.required_styles.contains(&profile.storytelling_style) {
                0.5
            } else {
                0.0
            },
            audience: match_ratio(profile.audience_type == self.profile.audience_type),
            theme_overlap: self.theme_overlap(profile),
            era: self.rules.era_similarity(profile.release_era) as f64,
            mass_appeal: 1.0 - profile.mass_appeal_score.abs_diff(self.profile.mass_appeal_score) as f64 / 100.0,
            language: match_ratio(self.rules.is_preferred_language(&candidate.culture.language)),
        }
    }

    /// Jaccard similarity of the genre sets
    fn genre_overlap(&self, genres: &[u32]) -> f64 {
        let candidate: HashSet<u32> = genres.iter().copied().collect();
        let union = self.reference_genres.union(&candidate).count();
        if union == 0 {
            return 0.0;
        }
        self.reference_genres.intersection(&candidate).count() as f64 / union as f64
    }

    /// Share of the reference's themes the candidate also carries.
    /// References without themes score a neutral 0.5.
    fn theme_overlap(&self, profile: &CinematicProfile) -> f64 {
        if self.profile.themes.is_empty() {
            return 0.5;
        }
        let shared = self.profile.themes.iter().filter(|t| profile.has_theme(**t)).count();
        shared as f64 / self.profile.themes.len() as f64
    }
}

fn match_ratio(matches: bool) -> f64 {
    if matches { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CandidateItem, MediaType, genres};
    use profiler::{CinematicProfiler, CulturalContext};

    fn item(id: u64, title: &str, language: &str, genre_ids: Vec<u32>, year: u16, votes: u32, overview: &str) -> CandidateItem {
        CandidateItem {
            id,
            title: title.to_string(),
            media_type: MediaType::Movie,
            original_language: language.to_string(),
            countries: vec!["IN".to_string()],
            genre_ids,
            release_year: Some(year),
            vote_count: votes,
            popularity: votes as f32 / 200.0,
            vote_average: 7.4,
            overview: overview.to_string(),
        }
    }

    fn profiled(item: CandidateItem) -> ProfiledCandidate {
        let profiler = CinematicProfiler::default();
        let culture = CulturalContext::detect(&item, None);
        let profile = profiler.profile_item(&item, &culture);
        ProfiledCandidate { item, culture, profile }
    }

    #[test]
    fn test_identical_candidate_scores_high() {
        let reference = profiled(item(
            1,
            "Kingdom of Blades",
            "te",
            vec![genres::ACTION, genres::DRAMA],
            2017,
            9000,
            "An epic war for the throne and a hero's revenge",
        ));
        let rules = CulturalFilterRules::from_profile(&reference.profile, &reference.culture);
        let scorer = SimilarityScorer::new(&reference, &rules);

        let twin = reference.clone();
        let score = scorer.score_single(&twin);
        assert_eq!(score.genre_overlap, 1.0);
        assert_eq!(score.mass_appeal, 1.0);
        assert_eq!(score.era, 1.0);
        assert!(score.total() > 90.0);
    }

    #[test]
    fn test_unrelated_candidate_scores_low() {
        let reference = profiled(item(
            1,
            "Kingdom of Blades",
            "te",
            vec![genres::ACTION, genres::DRAMA],
            2017,
            9000,
            "An epic war for the throne and a hero's revenge",
        ));
        let rules = CulturalFilterRules::from_profile(&reference.profile, &reference.culture);
        let scorer = SimilarityScorer::new(&reference, &rules);

        let other = profiled(item(2, "Small Talk", "fr", vec![genres::COMEDY], 1985, 40, "Two neighbours bicker"));
        let near = profiled(item(
            3,
            "Fort of Kings",
            "te",
            vec![genres::ACTION],
            2018,
            7000,
            "A warrior rises to reclaim the kingdom",
        ));

        let scores = scorer.score_all(&[other, near]);
        assert_eq!(scores[0].genre_overlap, 0.0);
        assert!(scores[0].total() < scores[1].total());
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(&s.total())));
    }
}
