//! Feedback-driven preference learning and personalized ranking.
//!
//! This crate provides:
//! - `PreferenceLearningState`, the per-session feedback history with
//!   derived counters and attribute weights
//! - `recompute_weights`, the pure decay-and-clamp weight rebuild
//! - `PersonalizationScorer`, blending reference similarity with learned
//!   weights and an exploration bonus
//! - `rank_with_diversity`, sorting plus a bounded exploratory splice
//!
//! ## Example Usage
//! ```ignore
//! use learning::{FeedbackTarget, FeedbackValue, PreferenceLearningState, RankingConfig};
//! use learning::rank_with_diversity;
//!
//! let mut state = PreferenceLearningState::default();
//! state.record_feedback(FeedbackTarget::from_profiled(&liked), FeedbackValue::Like, None, Utc::now());
//!
//! let ranked = rank_with_diversity(candidates, &state, &RankingConfig::default());
//! for entry in ranked.iter().take(10) {
//!     println!("{:.1} {:?}", entry.score.final_score, entry.score.explanation);
//! }
//! ```

pub mod config;
pub mod error;
pub mod personalization;
pub mod ranking;
pub mod state;
pub mod types;
pub mod weights;

pub use config::{LearningConfig, RankingConfig};
pub use error::{LearningError, Result};
pub use personalization::{
    PersonalizationScore, PersonalizationScorer, Ranked, RankingCandidate, ScoreConfidence,
    ScoringInput, score_personalization,
};
pub use ranking::{rank_with_diversity, sort_by_final_score};
pub use state::{PreferenceLearningState, TopPreferences, merge_states};
pub use types::{AttributeKey, FeedbackTarget, FeedbackValue, MovieAttributes, UserFeedback};
pub use weights::{AttributeWeights, recency_multiplier, recompute_weights};
