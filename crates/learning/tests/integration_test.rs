//! End-to-end learning: profiled candidates in, feedback recorded, ranking out.

use catalog::{CandidateItem, MediaType, genres};
use chrono::{DateTime, Duration, TimeZone, Utc};
use learning::{
    AttributeKey, FeedbackTarget, FeedbackValue, MovieAttributes, PreferenceLearningState,
    RankingCandidate, RankingConfig, merge_states, rank_with_diversity, recompute_weights,
};
use profiler::{CinematicProfiler, ProfiledCandidate};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn item(id: u64, title: &str, language: &str, genre_ids: Vec<u32>, year: u16) -> CandidateItem {
    CandidateItem {
        id,
        title: title.to_string(),
        media_type: MediaType::Movie,
        original_language: language.to_string(),
        countries: vec![],
        genre_ids,
        release_year: Some(year),
        vote_count: 4000,
        popularity: 40.0,
        vote_average: 7.2,
        overview: String::new(),
    }
}

fn profile(items: Vec<CandidateItem>) -> Vec<ProfiledCandidate> {
    CinematicProfiler::default().profile_candidates(items)
}

struct Scored {
    candidate: ProfiledCandidate,
    attributes: MovieAttributes,
    reference_score: f64,
}

impl RankingCandidate for Scored {
    fn attributes(&self) -> &MovieAttributes {
        &self.attributes
    }

    fn reference_score(&self) -> f64 {
        self.reference_score
    }
}

#[test]
fn test_feedback_shifts_ranking() {
    let candidates = profile(vec![
        item(1, "Desert Raid", "te", vec![genres::ACTION], 2015),
        item(2, "Quiet Letters", "fr", vec![genres::ROMANCE, genres::DRAMA], 2015),
        item(3, "Harbour Chase", "te", vec![genres::ACTION, genres::THRILLER], 2016),
        item(4, "Garden Party", "fr", vec![genres::COMEDY], 2014),
    ]);

    let mut state = PreferenceLearningState::default();
    for liked in candidates.iter().filter(|c| c.item.original_language == "te") {
        state.record_feedback(FeedbackTarget::from_profiled(liked), FeedbackValue::Like, Some(99), now());
    }
    for disliked in candidates.iter().filter(|c| c.item.original_language == "fr") {
        state.record_feedback(FeedbackTarget::from_profiled(disliked), FeedbackValue::Dislike, Some(99), now());
    }
    assert_eq!(state.total_likes(), 2);
    assert_eq!(state.total_dislikes(), 2);
    assert!(state.weight(&AttributeKey::Language("te".to_string())).unwrap() > 0.0);
    assert!(state.weight(&AttributeKey::Language("fr".to_string())).unwrap() < 0.0);

    // Equal reference scores: only preferences separate the candidates
    let inputs: Vec<Scored> = candidates
        .into_iter()
        .map(|candidate| Scored {
            attributes: MovieAttributes::from_profiled(&candidate),
            candidate,
            reference_score: 60.0,
        })
        .collect();
    let ranked = rank_with_diversity(inputs, &state, &RankingConfig::default());

    let order: Vec<&str> = ranked.iter().map(|r| r.item.candidate.item.original_language.as_str()).collect();
    assert_eq!(order, vec!["te", "te", "fr", "fr"]);
    assert!(ranked.iter().all(|r| (0.0..=100.0).contains(&r.score.final_score)));
}

#[test]
fn test_persistence_and_merge_keep_invariants() {
    let candidates = profile(vec![
        item(10, "Northern Lights", "ko", vec![genres::DRAMA], 2005),
        item(11, "Iron Gate", "ko", vec![genres::ACTION], 2021),
        item(12, "Monsoon", "ml", vec![genres::DRAMA], 1995),
    ]);

    let mut laptop = PreferenceLearningState::default();
    laptop.record_feedback(
        FeedbackTarget::from_profiled(&candidates[0]),
        FeedbackValue::Like,
        None,
        now() - Duration::days(21),
    );
    laptop.record_feedback(FeedbackTarget::from_profiled(&candidates[1]), FeedbackValue::Dislike, None, now());

    let mut phone = PreferenceLearningState::default();
    phone.record_feedback(FeedbackTarget::from_profiled(&candidates[1]), FeedbackValue::Like, None, now());
    phone.record_feedback(FeedbackTarget::from_profiled(&candidates[2]), FeedbackValue::Like, None, now());

    let merged = merge_states(&laptop, &phone, now());
    assert_eq!(merged.history().len(), 3);
    assert_eq!(merged.get_feedback(11, MediaType::Movie), FeedbackValue::Dislike);
    assert_eq!(merged.total_likes() + merged.total_dislikes(), 3);
    assert_eq!(merged.weights(), &recompute_weights(merged.history(), merged.config(), now()));

    let json = serde_json::to_string(&merged).unwrap();
    let restored: PreferenceLearningState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.total_likes(), merged.total_likes());
    assert_eq!(restored.weights(), merged.weights());
    assert!(restored.weights().values().all(|w| w.abs() <= restored.config().max_weight));
}
