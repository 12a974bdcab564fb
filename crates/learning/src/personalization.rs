//! Personalization scoring.
//!
//! ## Score composition
//! `final = clamp(reference + adjustment + exploration, 0, 100)` where
//! - `reference` is the externally computed similarity to the reference title
//! - `adjustment` is the averaged learned weight of the candidate's
//!   attributes, rescaled to `[-30, 30]` and multiplied by
//!   `preference_influence`
//! - `exploration` rewards attributes the user has never rated, in `[0, 10]`
//!
//! Preferences stay silent until the session has `min_feedback_threshold`
//! likes plus dislikes.

use crate::config::LearningConfig;
use crate::state::PreferenceLearningState;
use crate::types::{AttributeKey, MovieAttributes};
use profiler::ReleaseEra;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// Half-width of the preference band before influence is applied
pub const PREFERENCE_BAND: f64 = 30.0;
pub const MAX_EXPLORATION_BONUS: f64 = 10.0;
/// Likes needed before novelty is rewarded
pub const EXPLORATION_MIN_LIKES: u32 = 3;

const GENRE_MULTIPLIER: f64 = 1.0;
const LANGUAGE_MULTIPLIER: f64 = 1.5;
const INDUSTRY_MULTIPLIER: f64 = 1.2;
const ERA_MULTIPLIER: f64 = 1.0;
const THEME_MULTIPLIER: f64 = 0.5;

const NOVEL_GENRE_POINTS: f64 = 3.0;
const NOVEL_LANGUAGE_POINTS: f64 = 3.0;
const NOVEL_ERA_POINTS: f64 = 2.0;

/// Contributions with a magnitude below this are left out of explanations
const EXPLANATION_MIN_CONTRIBUTION: f64 = 0.5;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreConfidence {
    High,
    Medium,
    Low,
}

impl ScoreConfidence {
    /// High from 10 feedback records, medium from 5
    pub fn from_feedback_count(count: u32) -> Self {
        match count {
            10.. => ScoreConfidence::High,
            5.. => ScoreConfidence::Medium,
            _ => ScoreConfidence::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizationScore {
    pub reference_score: f64,
    pub preference_adjustment: f64,
    pub exploration_bonus: f64,
    pub final_score: f64,
    pub confidence: ScoreConfidence,
    pub explanation: Vec<String>,
}

/// Anything that can be ranked: attributes plus a reference-similarity score
pub trait RankingCandidate: Send + Sync {
    fn attributes(&self) -> &MovieAttributes;

    /// Similarity to the reference title, 0-100
    fn reference_score(&self) -> f64;
}

/// Plain attributes + score pair
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringInput {
    pub attributes: MovieAttributes,
    pub reference_score: f64,
}

impl RankingCandidate for ScoringInput {
    fn attributes(&self) -> &MovieAttributes {
        &self.attributes
    }

    fn reference_score(&self) -> f64 {
        self.reference_score
    }
}

/// A candidate with its personalization score
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub item: T,
    pub score: PersonalizationScore,
}

// ============================================================================
// Scorer
// ============================================================================

/// Scores candidates against a learning state
pub struct PersonalizationScorer<'a> {
    state: &'a PreferenceLearningState,
}

impl<'a> PersonalizationScorer<'a> {
    pub fn new(state: &'a PreferenceLearningState) -> Self {
        Self { state }
    }

    pub fn score(&self, attributes: &MovieAttributes, reference_score: f64) -> PersonalizationScore {
        let config = self.state.config();
        let reference_score = reference_score.clamp(0.0, 100.0);
        let feedback_count = self.state.feedback_count();
        let exploration_bonus = self.exploration_bonus(attributes, config);

        let mut explanation = Vec::new();
        let preference_adjustment = if feedback_count < config.min_feedback_threshold {
            explanation.push("not enough feedback".to_string());
            0.0
        } else {
            self.preference_adjustment(attributes, config, &mut explanation)
        };
        if exploration_bonus > 0.0 {
            explanation.push(format!("something new for you (+{:.0})", exploration_bonus));
        }

        PersonalizationScore {
            reference_score,
            preference_adjustment,
            exploration_bonus,
            final_score: (reference_score + preference_adjustment + exploration_bonus).clamp(0.0, 100.0),
            confidence: ScoreConfidence::from_feedback_count(feedback_count),
            explanation,
        }
    }

    /// Score every candidate in parallel, preserving input order
    pub fn score_all<T: RankingCandidate>(&self, candidates: Vec<T>) -> Vec<Ranked<T>> {
        candidates
            .into_par_iter()
            .map(|item| {
                let score = self.score(item.attributes(), item.reference_score());
                Ranked { item, score }
            })
            .collect()
    }

    fn preference_adjustment(
        &self,
        attributes: &MovieAttributes,
        config: &LearningConfig,
        explanation: &mut Vec<String>,
    ) -> f64 {
        let mut contributions: Vec<(AttributeKey, f64)> = Vec::new();
        let mut add = |key: AttributeKey, multiplier: f64| {
            if let Some(weight) = self.state.weight(&key) {
                contributions.push((key, weight * multiplier));
            }
        };

        for genre in &attributes.genre_ids {
            add(AttributeKey::Genre(*genre), GENRE_MULTIPLIER);
        }
        if !attributes.language.is_empty() {
            add(AttributeKey::Language(attributes.language.to_lowercase()), LANGUAGE_MULTIPLIER);
        }
        add(AttributeKey::Industry(attributes.industry), INDUSTRY_MULTIPLIER);
        if attributes.era != ReleaseEra::Unknown {
            add(AttributeKey::Era(attributes.era), ERA_MULTIPLIER);
        }
        for theme in &attributes.themes {
            add(AttributeKey::Theme(*theme), THEME_MULTIPLIER);
        }

        if contributions.is_empty() {
            return 0.0;
        }

        let average = contributions.iter().map(|(_, c)| c).sum::<f64>() / contributions.len() as f64;
        let adjustment =
            (average / config.max_weight * PREFERENCE_BAND).clamp(-PREFERENCE_BAND, PREFERENCE_BAND)
                * config.preference_influence;

        contributions.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(Ordering::Equal)
        });
        for (key, contribution) in contributions.iter().take(2) {
            if contribution.abs() < EXPLANATION_MIN_CONTRIBUTION {
                continue;
            }
            if *contribution > 0.0 {
                explanation.push(format!("you like {}", key.label()));
            } else {
                explanation.push(format!("you tend to skip {}", key.label()));
            }
        }

        adjustment
    }

    fn exploration_bonus(&self, attributes: &MovieAttributes, config: &LearningConfig) -> f64 {
        if self.state.total_likes() < EXPLORATION_MIN_LIKES {
            return 0.0;
        }

        let mut points = 0.0;
        if attributes
            .genre_ids
            .iter()
            .any(|g| !self.state.has_explored(&AttributeKey::Genre(*g)))
        {
            points += NOVEL_GENRE_POINTS;
        }
        if !attributes.language.is_empty()
            && !self
                .state
                .has_explored(&AttributeKey::Language(attributes.language.to_lowercase()))
        {
            points += NOVEL_LANGUAGE_POINTS;
        }
        if attributes.era != ReleaseEra::Unknown
            && !self.state.has_explored(&AttributeKey::Era(attributes.era))
        {
            points += NOVEL_ERA_POINTS;
        }

        let scale = config.exploration_factor / LearningConfig::BASELINE_EXPLORATION;
        (points * scale).min(MAX_EXPLORATION_BONUS)
    }
}

/// Score one candidate against `state`
pub fn score_personalization(
    state: &PreferenceLearningState,
    attributes: &MovieAttributes,
    reference_score: f64,
) -> PersonalizationScore {
    PersonalizationScorer::new(state).score(attributes, reference_score)
}
