//! Ranking with a diversity quota.
//!
//! Candidates are sorted by final score. Once a user has enough likes, a
//! small number of exploratory items from outside the head are moved into
//! the middle of the head so novel titles surface without dominating.

use crate::config::RankingConfig;
use crate::personalization::{PersonalizationScorer, Ranked, RankingCandidate};
use crate::state::PreferenceLearningState;
use std::cmp::Ordering;
use tracing::debug;

/// Likes needed before the diversity pass runs
pub const DIVERSITY_MIN_LIKES: u32 = 5;
/// Lists this short are returned as sorted
pub const DIVERSITY_MIN_ITEMS: usize = 5;
/// Minimum exploration bonus for an item to count as exploratory
pub const EXPLORATORY_MIN_BONUS: f64 = 2.0;
/// Earliest position exploratory items are spliced into
pub const DIVERSITY_INSERT_POSITION: usize = 5;

/// Score, sort and diversify `candidates`
pub fn rank_with_diversity<T: RankingCandidate>(
    candidates: Vec<T>,
    state: &PreferenceLearningState,
    ranking: &RankingConfig,
) -> Vec<Ranked<T>> {
    let mut ranked = PersonalizationScorer::new(state).score_all(candidates);
    sort_by_final_score(&mut ranked);

    if state.total_likes() < DIVERSITY_MIN_LIKES || ranked.len() <= DIVERSITY_MIN_ITEMS {
        return ranked;
    }

    let slots = (ranking.top_count as f64 * state.config().exploration_factor).floor() as usize;
    inject_exploratory(ranked, ranking.top_count, slots)
}

/// Stable sort, highest final score first
pub fn sort_by_final_score<T>(ranked: &mut [Ranked<T>]) {
    ranked.sort_by(|a, b| {
        b.score
            .final_score
            .partial_cmp(&a.score.final_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Move up to `slots` exploratory items from beyond `top_count` into the
/// head. Relative order of everything else is preserved and no item is
/// duplicated.
fn inject_exploratory<T>(ranked: Vec<Ranked<T>>, top_count: usize, slots: usize) -> Vec<Ranked<T>> {
    if slots == 0 || ranked.len() <= top_count {
        return ranked;
    }

    let mut rest = Vec::with_capacity(ranked.len());
    let mut chosen = Vec::with_capacity(slots);
    for (position, item) in ranked.into_iter().enumerate() {
        if position >= top_count && chosen.len() < slots && item.score.exploration_bonus >= EXPLORATORY_MIN_BONUS {
            chosen.push(item);
        } else {
            rest.push(item);
        }
    }
    if chosen.is_empty() {
        return rest;
    }

    let insert_at = DIVERSITY_INSERT_POSITION
        .min(top_count.saturating_sub(chosen.len()))
        .min(rest.len());
    debug!("Injecting {} exploratory items at position {}", chosen.len(), insert_at);

    let tail = rest.split_off(insert_at);
    rest.extend(chosen);
    rest.extend(tail);
    rest
}
