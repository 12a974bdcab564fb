//! Per-session preference learning state.
//!
//! The state is an ordered feedback history plus everything derived from
//! it: like/dislike counters and attribute weights. Every mutation
//! recomputes the derived parts, so after any sequence of operations the
//! counters equal the like/dislike records in the history and the weights
//! equal `recompute_weights(history)`.

use crate::config::LearningConfig;
use crate::error::{LearningError, Result};
use crate::types::{AttributeKey, FeedbackTarget, FeedbackValue, UserFeedback};
use crate::weights::{AttributeWeights, recompute_weights};
use catalog::{MediaId, MediaType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

type FeedbackKey = (MediaType, MediaId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PersistedState", into = "PersistedState")]
pub struct PreferenceLearningState {
    history: Vec<UserFeedback>,
    weights: AttributeWeights,
    config: LearningConfig,
    total_likes: u32,
    total_dislikes: u32,
    last_updated: Option<DateTime<Utc>>,
    /// Position of each record in `history`
    index: HashMap<FeedbackKey, usize>,
    /// Attribute keys carried by any record, neutral ones included
    explored: BTreeSet<AttributeKey>,
}

/// On-disk form. Counters and weights are written for readability only and
/// rebuilt from the history on load.
#[derive(Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    feedback_history: Vec<UserFeedback>,
    #[serde(default)]
    config: LearningConfig,
    #[serde(default)]
    total_likes: u32,
    #[serde(default)]
    total_dislikes: u32,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    attribute_weights: AttributeWeights,
}

impl From<PersistedState> for PreferenceLearningState {
    fn from(persisted: PersistedState) -> Self {
        let mut state = Self::new(persisted.config);
        state.history = dedup_by_key(persisted.feedback_history);
        state.last_updated = persisted.last_updated;
        let now = persisted
            .last_updated
            .or_else(|| state.history.iter().map(|r| r.timestamp).max())
            .unwrap_or_else(Utc::now);
        state.rebuild(now);
        state
    }
}

impl From<PreferenceLearningState> for PersistedState {
    fn from(state: PreferenceLearningState) -> Self {
        Self {
            feedback_history: state.history,
            config: state.config,
            total_likes: state.total_likes,
            total_dislikes: state.total_dislikes,
            last_updated: state.last_updated,
            attribute_weights: state.weights,
        }
    }
}

/// Strongest learned likes and dislikes
#[derive(Debug, Clone, PartialEq)]
pub struct TopPreferences {
    /// Positive weights, strongest first
    pub liked: Vec<(AttributeKey, f64)>,
    /// Negative weights, strongest first
    pub disliked: Vec<(AttributeKey, f64)>,
}

impl PreferenceLearningState {
    pub fn new(config: LearningConfig) -> Self {
        Self {
            history: Vec::new(),
            weights: AttributeWeights::new(),
            config,
            total_likes: 0,
            total_dislikes: 0,
            last_updated: None,
            index: HashMap::new(),
            explored: BTreeSet::new(),
        }
    }

    pub fn history(&self) -> &[UserFeedback] {
        &self.history
    }

    pub fn weights(&self) -> &AttributeWeights {
        &self.weights
    }

    /// Learned weight for a key, if it has ever been touched
    pub fn weight(&self, key: &AttributeKey) -> Option<f64> {
        self.weights.get(key).copied()
    }

    /// Whether any recorded title carries `key`, whatever its weight
    pub fn has_explored(&self, key: &AttributeKey) -> bool {
        self.explored.contains(key)
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn total_likes(&self) -> u32 {
        self.total_likes
    }

    pub fn total_dislikes(&self) -> u32 {
        self.total_dislikes
    }

    /// Like plus dislike records
    pub fn feedback_count(&self) -> u32 {
        self.total_likes + self.total_dislikes
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Switch to a new config and recompute weights under it
    pub fn set_config(&mut self, config: LearningConfig, now: DateTime<Utc>) {
        self.config = config;
        self.recompute(now);
    }

    /// Record feedback, replacing any earlier record for the same title.
    ///
    /// Returns the id of the stored record.
    pub fn record_feedback(
        &mut self,
        target: FeedbackTarget,
        feedback: FeedbackValue,
        reference_media_id: Option<MediaId>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let record = UserFeedback {
            id: Uuid::new_v4(),
            media_id: target.media_id,
            media_type: target.media_type,
            feedback,
            attributes: target.attributes,
            reference_media_id,
            timestamp: now,
        };
        let id = record.id;
        let key = record.key();

        match self.index.get(&key) {
            Some(&position) => {
                let previous = self.history[position].feedback;
                self.adjust_counters(previous, -1);
                debug!(
                    "Replacing {:?} feedback for {} {} with {:?}",
                    previous, key.0, key.1, feedback
                );
                self.history[position] = record;
            }
            None => {
                self.index.insert(key, self.history.len());
                self.history.push(record);
            }
        }
        self.adjust_counters(feedback, 1);

        self.recompute(now);
        id
    }

    /// Delete the record for a title. No-op (returning `false`) when absent.
    pub fn remove_feedback(&mut self, media_id: MediaId, media_type: MediaType, now: DateTime<Utc>) -> bool {
        let Some(position) = self.index.remove(&(media_type, media_id)) else {
            return false;
        };
        let removed = self.history.remove(position);
        self.adjust_counters(removed.feedback, -1);
        self.rebuild_index();
        self.recompute(now);
        true
    }

    /// Current feedback for a title, `Neutral` when none was recorded
    pub fn get_feedback(&self, media_id: MediaId, media_type: MediaType) -> FeedbackValue {
        self.index
            .get(&(media_type, media_id))
            .map(|&position| self.history[position].feedback)
            .unwrap_or(FeedbackValue::Neutral)
    }

    /// Keys of every rated title
    pub fn rated_keys(&self) -> impl Iterator<Item = FeedbackKey> + '_ {
        self.history.iter().map(UserFeedback::key)
    }

    /// Drop all feedback, keeping the config
    pub fn clear(&mut self, now: DateTime<Utc>) {
        self.history.clear();
        self.rebuild(now);
    }

    /// Recompute weights as of `now`
    pub fn recompute(&mut self, now: DateTime<Utc>) {
        self.weights = recompute_weights(&self.history, &self.config, now);
        self.explored = self.history.iter().flat_map(|r| r.attributes.keys()).collect();
        self.last_updated = Some(now);
    }

    /// The `n` strongest positive and negative weights
    pub fn top_preferences(&self, n: usize) -> TopPreferences {
        let mut liked: Vec<(AttributeKey, f64)> = self
            .weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(k, w)| (k.clone(), *w))
            .collect();
        liked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        liked.truncate(n);

        let mut disliked: Vec<(AttributeKey, f64)> = self
            .weights
            .iter()
            .filter(|(_, w)| **w < 0.0)
            .map(|(k, w)| (k.clone(), *w))
            .collect();
        disliked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        disliked.truncate(n);

        TopPreferences { liked, disliked }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LearningError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let state: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        state.config.validate()?;
        info!(
            "Loaded learning state from {} ({} feedback records)",
            path.display(),
            state.history.len()
        );
        Ok(state)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved learning state to {}", path.display());
        Ok(())
    }

    fn adjust_counters(&mut self, feedback: FeedbackValue, delta: i32) {
        let counter = match feedback {
            FeedbackValue::Like => &mut self.total_likes,
            FeedbackValue::Dislike => &mut self.total_dislikes,
            FeedbackValue::Neutral => return,
        };
        *counter = counter.saturating_add_signed(delta);
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .history
            .iter()
            .enumerate()
            .map(|(position, record)| (record.key(), position))
            .collect();
    }

    /// Rebuild index, counters and weights from the history
    fn rebuild(&mut self, now: DateTime<Utc>) {
        self.rebuild_index();
        self.total_likes = 0;
        self.total_dislikes = 0;
        for position in 0..self.history.len() {
            let feedback = self.history[position].feedback;
            self.adjust_counters(feedback, 1);
        }
        self.recompute(now);
    }
}

impl Default for PreferenceLearningState {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

/// Keep the first record for each key, preserving order
fn dedup_by_key(history: Vec<UserFeedback>) -> Vec<UserFeedback> {
    let mut seen = std::collections::HashSet::new();
    history.into_iter().filter(|r| seen.insert(r.key())).collect()
}

/// Merge two histories.
///
/// Records are unioned by `(media_type, media_id)`; on conflict the
/// primary's record wins. Weights are recomputed from the merged history,
/// never merged directly. The primary's config is kept.
pub fn merge_states(
    primary: &PreferenceLearningState,
    secondary: &PreferenceLearningState,
    now: DateTime<Utc>,
) -> PreferenceLearningState {
    let mut merged = PreferenceLearningState::new(primary.config);
    merged.history = dedup_by_key(
        primary
            .history
            .iter()
            .chain(secondary.history.iter())
            .cloned()
            .collect(),
    );
    merged.rebuild(now);
    info!(
        "Merged {} + {} feedback records into {}",
        primary.history.len(),
        secondary.history.len(),
        merged.history.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieAttributes;
    use catalog::genres;
    use chrono::{Duration, TimeZone};
    use profiler::{Industry, ReleaseEra};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn target(id: MediaId, genre: u32) -> FeedbackTarget {
        FeedbackTarget {
            media_id: id,
            media_type: MediaType::Movie,
            attributes: MovieAttributes {
                genre_ids: vec![genre],
                language: "ta".to_string(),
                industry: Industry::Kollywood,
                era: ReleaseEra::Recent,
                themes: vec![],
                narrative_scale: None,
                audience_type: None,
            },
        }
    }

    fn assert_counters_match_history(state: &PreferenceLearningState) {
        let likes = state.history().iter().filter(|r| r.feedback == FeedbackValue::Like).count();
        let dislikes = state
            .history()
            .iter()
            .filter(|r| r.feedback == FeedbackValue::Dislike)
            .count();
        assert_eq!(state.total_likes() as usize, likes);
        assert_eq!(state.total_dislikes() as usize, dislikes);
    }

    #[test]
    fn test_record_replaces_existing() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Dislike, Some(9), now());

        assert_eq!(state.history().len(), 1);
        assert_eq!(state.total_likes(), 0);
        assert_eq!(state.total_dislikes(), 1);
        assert_eq!(state.get_feedback(1, MediaType::Movie), FeedbackValue::Dislike);
        assert_eq!(state.history()[0].reference_media_id, Some(9));
        assert_eq!(state.weight(&AttributeKey::Genre(genres::ACTION)), Some(-1.0));
    }

    #[test]
    fn test_same_id_different_media_type_is_separate() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        let mut series = target(1, genres::ACTION);
        series.media_type = MediaType::Series;
        state.record_feedback(series, FeedbackValue::Like, None, now());

        assert_eq!(state.history().len(), 2);
        assert_eq!(state.total_likes(), 2);
    }

    #[test]
    fn test_remove_feedback() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(2, genres::COMEDY), FeedbackValue::Dislike, None, now());
        state.record_feedback(target(3, genres::DRAMA), FeedbackValue::Like, None, now());

        assert!(state.remove_feedback(2, MediaType::Movie, now()));
        assert!(!state.remove_feedback(2, MediaType::Movie, now()));
        assert!(!state.remove_feedback(99, MediaType::Series, now()));

        assert_eq!(state.get_feedback(2, MediaType::Movie), FeedbackValue::Neutral);
        // Index still points at the right records after the shift
        assert_eq!(state.get_feedback(3, MediaType::Movie), FeedbackValue::Like);
        assert_eq!(state.weight(&AttributeKey::Genre(genres::COMEDY)), None);
        assert_counters_match_history(&state);
    }

    #[test]
    fn test_explored_follows_records_not_weights() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(2, genres::ACTION), FeedbackValue::Dislike, None, now());
        state.record_feedback(target(3, genres::HORROR), FeedbackValue::Neutral, None, now());

        let action = AttributeKey::Genre(genres::ACTION);
        let horror = AttributeKey::Genre(genres::HORROR);
        assert_eq!(state.weight(&action), Some(0.0));
        assert!(state.has_explored(&action));
        assert_eq!(state.weight(&horror), None);
        assert!(state.has_explored(&horror));
        assert!(!state.has_explored(&AttributeKey::Genre(genres::COMEDY)));

        state.remove_feedback(3, MediaType::Movie, now());
        assert!(!state.has_explored(&horror));
    }

    #[test]
    fn test_counters_after_mixed_sequence() {
        let mut state = PreferenceLearningState::default();
        let values = [FeedbackValue::Like, FeedbackValue::Dislike, FeedbackValue::Neutral];
        for step in 0..30u64 {
            let id = step % 7;
            let value = values[(step % 3) as usize];
            if step % 5 == 4 {
                state.remove_feedback(id, MediaType::Movie, now());
            } else {
                state.record_feedback(target(id, genres::ACTION), value, None, now());
            }
            assert_counters_match_history(&state);
            assert!(state.weights().values().all(|w| w.abs() <= 5.0));
        }
    }

    #[test]
    fn test_top_preferences() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(2, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(3, genres::HORROR), FeedbackValue::Dislike, None, now());

        let top = state.top_preferences(1);
        assert_eq!(top.liked.len(), 1);
        // Shared keys (genre, language, industry, era) all sit at +1 after the
        // dislike, Action alone sits at +2
        assert_eq!(top.liked[0], (AttributeKey::Genre(genres::ACTION), 2.0));
        assert_eq!(top.disliked[0], (AttributeKey::Genre(genres::HORROR), -1.0));
    }

    #[test]
    fn test_persisted_state_rebuilds_derived_fields() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, now());
        state.record_feedback(target(2, genres::DRAMA), FeedbackValue::Dislike, None, now());

        let mut json: serde_json::Value = serde_json::to_value(&state).unwrap();
        // Tampered counters and weights are ignored on load
        json["total_likes"] = serde_json::json!(40);
        json["attribute_weights"] = serde_json::json!({"genre:28": 5.0});

        let restored: PreferenceLearningState = serde_json::from_value(json).unwrap();
        assert_eq!(restored.total_likes(), 1);
        assert_eq!(restored.total_dislikes(), 1);
        assert_eq!(restored.weights(), state.weights());
        assert_eq!(restored.get_feedback(2, MediaType::Movie), FeedbackValue::Dislike);
    }

    #[test]
    fn test_merge_prefers_primary_and_recomputes() {
        let earlier = now() - Duration::days(7);
        let mut primary = PreferenceLearningState::default();
        primary.record_feedback(target(1, genres::ACTION), FeedbackValue::Like, None, earlier);

        let mut secondary = PreferenceLearningState::default();
        secondary.record_feedback(target(1, genres::ACTION), FeedbackValue::Dislike, None, now());
        secondary.record_feedback(target(2, genres::COMEDY), FeedbackValue::Like, None, now());

        let merged = merge_states(&primary, &secondary, now());
        assert_eq!(merged.history().len(), 2);
        assert_eq!(merged.get_feedback(1, MediaType::Movie), FeedbackValue::Like);
        assert_eq!(merged.get_feedback(2, MediaType::Movie), FeedbackValue::Like);
        assert_eq!(merged.total_likes(), 2);
        assert_eq!(
            merged.weights(),
            &recompute_weights(merged.history(), merged.config(), now())
        );
    }

    #[test]
    fn test_save_and_load() {
        let mut state = PreferenceLearningState::default();
        state.record_feedback(target(5, genres::THRILLER), FeedbackValue::Like, Some(1), now());

        let path = std::env::temp_dir().join(format!("learning-state-{}.json", Uuid::new_v4()));
        state.save_to_file(&path).unwrap();
        let loaded = PreferenceLearningState::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, state);
    }
}
