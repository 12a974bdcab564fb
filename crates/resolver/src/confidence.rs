//! Confidence calibration for a resolved reference.
//!
//! Five independent factors are summed into a 0-100 score:
//!
//! | factor      | range | signal                                   |
//! |-------------|-------|------------------------------------------|
//! | title match | 0-40  | how closely the title matches the query  |
//! | year match  | 0-20  | closeness to the requested year          |
//! | popularity  | 0-20  | vote count / popularity bucket           |
//! | uniqueness  | 0-10  | how many strong look-alikes exist        |
//! | relevance   | 0-10  | language in the popular-language list    |
//!
//! The score maps to a [`ConfidenceLevel`], and each level carries a fixed
//! [`Behavior`] telling the caller whether to proceed or ask.

use crate::extract::ExtractedReference;
use crate::matching::{jaccard_similarity, main_title, normalize_title};
use catalog::{CandidateItem, MediaId, MediaType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Most alternatives offered back to the user
pub const MAX_ALTERNATIVES: usize = 4;

/// Languages that get the full relevance bonus
pub const POPULAR_LANGUAGES: &[&str] = &[
    "en", "hi", "te", "ta", "ml", "kn", "ko", "ja", "zh", "es", "fr",
];

/// Votes an alternative needs before it counts as a real contender
const STRONG_ALTERNATIVE_MIN_VOTES: u32 = 100;

/// Share of the best match's votes an alternative needs to be a contender
const STRONG_ALTERNATIVE_VOTE_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Exact,
    High,
    Medium,
    Low,
    Ambiguous,
}

impl ConfidenceLevel {
    /// Numeric thresholds used when no override applies
    fn from_score(score: u32) -> Self {
        match score {
            90.. => ConfidenceLevel::Exact,
            75..=89 => ConfidenceLevel::High,
            55..=74 => ConfidenceLevel::Medium,
            35..=54 => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Ambiguous,
        }
    }
}

/// Individual factor scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub title_match: u32,
    pub year_match: u32,
    pub popularity: u32,
    pub uniqueness: u32,
    pub relevance: u32,
}

impl ConfidenceFactors {
    pub fn total(&self) -> u32 {
        self.title_match + self.year_match + self.popularity + self.uniqueness + self.relevance
    }
}

/// How strictly downstream matching should follow the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Strict,
    Moderate,
    Flexible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorAction {
    /// Go ahead without saying anything
    ProceedSilently,
    /// Go ahead and show a confidence badge
    ShowBadge,
    /// Go ahead with a soft "did I get this right" note
    SoftConfirm,
    /// Go ahead but ask a yes/no question
    AskConfirmation,
    /// Stop and ask which title was meant
    AskDisambiguation,
    /// Stop: nothing was found
    CheckSpelling,
}

/// A title offered back to the user for disambiguation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// 1-based number the user can reply with
    pub position: usize,
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u16>,
}

/// What the caller must do with a resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub should_proceed: bool,
    pub should_clarify: bool,
    pub strictness: Strictness,
    pub action: BehaviorAction,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub level: ConfidenceLevel,
    pub score: u32,
    pub factors: ConfidenceFactors,
    pub behavior: Behavior,
    /// Short label such as "92% match"
    pub badge: Option<String>,
    /// Text to show the user, if any
    pub message: Option<String>,
}

/// Calibrates how sure we are about a resolved reference
#[derive(Debug, Clone)]
pub struct ConfidenceScorer {
    popular_languages: HashSet<String>,
}

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self::with_popular_languages(POPULAR_LANGUAGES.iter().map(|l| l.to_string()))
    }

    pub fn with_popular_languages(languages: impl IntoIterator<Item = String>) -> Self {
        Self {
            popular_languages: languages.into_iter().map(|l| l.to_lowercase()).collect(),
        }
    }

    /// Score a resolution attempt.
    ///
    /// `candidates` is every search result considered, `best` the resolver's
    /// pick. An empty candidate list yields the "check spelling" result.
    pub fn score(
        &self,
        candidates: &[CandidateItem],
        best: Option<&CandidateItem>,
        reference: &ExtractedReference,
    ) -> ConfidenceScore {
        let best = match best {
            Some(best) if !candidates.is_empty() => best,
            _ => return no_candidates(&reference.title),
        };

        let strong_alternatives = count_strong_alternatives(candidates, best);
        let factors = ConfidenceFactors {
            title_match: title_match_score(&reference.title, &best.title),
            year_match: year_match_score(reference.year, best.release_year),
            popularity: popularity_score(best),
            uniqueness: uniqueness_score(strong_alternatives),
            relevance: self.relevance_score(&best.original_language),
        };
        let score = factors.total();

        let level = if factors.title_match >= 38 && factors.year_match == 20 {
            ConfidenceLevel::Exact
        } else if strong_alternatives >= 3 {
            ConfidenceLevel::Ambiguous
        } else {
            ConfidenceLevel::from_score(score)
        };

        debug!(
            "Confidence for '{}': {:?} ({}), factors {:?}, {} strong alternatives",
            best.title, level, score, factors, strong_alternatives
        );

        let alternatives = match level {
            ConfidenceLevel::Ambiguous => alternatives_including(best, candidates),
            ConfidenceLevel::Low => alternatives_excluding(best, candidates),
            ConfidenceLevel::Exact | ConfidenceLevel::High | ConfidenceLevel::Medium => Vec::new(),
        };

        let (badge, message) = explain(level, score, best, &reference.title, &alternatives);

        ConfidenceScore {
            level,
            score,
            factors,
            behavior: behavior_for(level, alternatives),
            badge,
            message,
        }
    }

    fn relevance_score(&self, language: &str) -> u32 {
        if self.popular_languages.contains(&language.to_lowercase()) {
            10
        } else {
            5
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Title factor (0-40)
///
/// - 40: identical ignoring case
/// - 38: identical after normalization, or equal to the main title
/// - 25-35: one contains the other, scaled by length ratio
/// - otherwise: token Jaccard × 30 above 0.7, × 20 at or below
pub fn title_match_score(query: &str, title: &str) -> u32 {
    if query.trim().to_lowercase() == title.trim().to_lowercase() {
        return 40;
    }

    let q = normalize_title(query);
    let t = normalize_title(title);
    if q.is_empty() || t.is_empty() {
        return 0;
    }
    if q == t || q == normalize_title(main_title(title)) {
        return 38;
    }

    if t.contains(&q) || q.contains(&t) {
        let (short, long) = if q.len() <= t.len() { (&q, &t) } else { (&t, &q) };
        let ratio = short.chars().count() as f64 / long.chars().count() as f64;
        return 25 + (ratio * 10.0).round() as u32;
    }

    let similarity = jaccard_similarity(query, title);
    if similarity > 0.7 {
        (similarity * 30.0).round() as u32
    } else {
        (similarity * 20.0).round() as u32
    }
}

/// Year factor (0-20). No requested year earns neutral credit.
pub fn year_match_score(requested: Option<u16>, released: Option<u16>) -> u32 {
    let Some(requested) = requested else {
        return 10;
    };
    let Some(released) = released else {
        return 5;
    };
    match (requested as i32 - released as i32).abs() {
        0 => 20,
        1 => 15,
        2..=3 => 10,
        _ => 3,
    }
}

/// Popularity factor (0-20): blockbuster / popular / known / obscure
pub fn popularity_score(item: &CandidateItem) -> u32 {
    let votes = item.vote_count;
    let popularity = item.popularity;
    if votes >= 10_000 || popularity >= 100.0 {
        20
    } else if votes >= 2_000 || popularity >= 40.0 {
        16
    } else if votes >= 200 || popularity >= 10.0 {
        12
    } else {
        6
    }
}

/// Uniqueness factor (0-10) from the number of strong alternatives
pub fn uniqueness_score(strong_alternatives: usize) -> u32 {
    match strong_alternatives {
        0 => 10,
        1 => 7,
        2..=3 => 4,
        _ => 2,
    }
}

/// Other candidates with enough votes to be a plausible intended title
pub fn count_strong_alternatives(candidates: &[CandidateItem], best: &CandidateItem) -> usize {
    let floor = best.vote_count as f64 * STRONG_ALTERNATIVE_VOTE_RATIO;
    candidates
        .iter()
        .filter(|c| c.key() != best.key())
        .filter(|c| c.vote_count >= STRONG_ALTERNATIVE_MIN_VOTES && c.vote_count as f64 >= floor)
        .count()
}

fn behavior_for(level: ConfidenceLevel, alternatives: Vec<Alternative>) -> Behavior {
    let (should_proceed, should_clarify, strictness, action) = match level {
        ConfidenceLevel::Exact => (true, false, Strictness::Strict, BehaviorAction::ProceedSilently),
        ConfidenceLevel::High => (true, false, Strictness::Strict, BehaviorAction::ShowBadge),
        ConfidenceLevel::Medium => (true, false, Strictness::Moderate, BehaviorAction::SoftConfirm),
        ConfidenceLevel::Low => (true, true, Strictness::Flexible, BehaviorAction::AskConfirmation),
        ConfidenceLevel::Ambiguous => (
            false,
            true,
            Strictness::Flexible,
            BehaviorAction::AskDisambiguation,
        ),
    };
    Behavior {
        should_proceed,
        should_clarify,
        strictness,
        action,
        alternatives,
    }
}

fn no_candidates(query: &str) -> ConfidenceScore {
    ConfidenceScore {
        level: ConfidenceLevel::Ambiguous,
        score: 0,
        factors: ConfidenceFactors::default(),
        behavior: Behavior {
            should_proceed: false,
            should_clarify: true,
            strictness: Strictness::Flexible,
            action: BehaviorAction::CheckSpelling,
            alternatives: Vec::new(),
        },
        badge: None,
        message: Some(format!(
            "I couldn't find anything called \"{}\". Could you check the spelling?",
            query
        )),
    }
}

fn explain(
    level: ConfidenceLevel,
    score: u32,
    best: &CandidateItem,
    query: &str,
    alternatives: &[Alternative],
) -> (Option<String>, Option<String>) {
    match level {
        ConfidenceLevel::Exact => (None, None),
        ConfidenceLevel::High => (Some(format!("{}% match", score)), None),
        ConfidenceLevel::Medium => (
            Some(format!("{}% match", score)),
            Some(format!(
                "Showing titles like {}. If you meant a different one, tell me the year.",
                best.display_title()
            )),
        ),
        ConfidenceLevel::Low => {
            let mut message = format!("Did you mean {}? (yes/no)", best.display_title());
            if !alternatives.is_empty() {
                message.push_str("\nOther possibilities:");
                message.push_str(&numbered(alternatives));
            }
            (None, Some(message))
        }
        ConfidenceLevel::Ambiguous => {
            let mut message = format!(
                "I found several titles called \"{}\". Which one do you mean?",
                query
            );
            message.push_str(&numbered(alternatives));
            message.push_str("\nReply with the number or the year.");
            (None, Some(message))
        }
    }
}

fn numbered(alternatives: &[Alternative]) -> String {
    alternatives
        .iter()
        .map(|a| match a.year {
            Some(year) => format!("\n{}. {} ({})", a.position, a.title, year),
            None => format!("\n{}. {}", a.position, a.title),
        })
        .collect()
}

/// Best match first, then the most voted others
fn alternatives_including(best: &CandidateItem, candidates: &[CandidateItem]) -> Vec<Alternative> {
    let mut picked = vec![best];
    picked.extend(by_votes_excluding(best, candidates));
    to_alternatives(picked)
}

fn alternatives_excluding(best: &CandidateItem, candidates: &[CandidateItem]) -> Vec<Alternative> {
    to_alternatives(by_votes_excluding(best, candidates))
}

fn by_votes_excluding<'a>(
    best: &CandidateItem,
    candidates: &'a [CandidateItem],
) -> Vec<&'a CandidateItem> {
    let mut others: Vec<&CandidateItem> = candidates
        .iter()
        .filter(|c| c.key() != best.key())
        .collect();
    others.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    others
}

fn to_alternatives(items: Vec<&CandidateItem>) -> Vec<Alternative> {
    items
        .into_iter()
        .take(MAX_ALTERNATIVES)
        .enumerate()
        .map(|(idx, item)| Alternative {
            position: idx + 1,
            id: item.id,
            media_type: item.media_type,
            title: item.title.clone(),
            year: item.release_year,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::genres;

    fn item(id: MediaId, title: &str, year: u16, votes: u32, language: &str) -> CandidateItem {
        CandidateItem {
            id,
            title: title.to_string(),
            media_type: MediaType::Movie,
            original_language: language.to_string(),
            countries: vec!["IN".to_string()],
            genre_ids: vec![genres::ACTION],
            release_year: Some(year),
            vote_count: votes,
            popularity: 5.0,
            vote_average: 7.0,
            overview: String::new(),
        }
    }

    #[test]
    fn test_exact_title_and_year_is_exact() {
        let best = item(1, "Baahubali: The Beginning", 2015, 20_000, "te");
        let candidates = vec![best.clone()];
        let reference = ExtractedReference::new("Baahubali", Some(2015));

        let result = ConfidenceScorer::new().score(&candidates, Some(&best), &reference);

        assert_eq!(result.level, ConfidenceLevel::Exact);
        assert!(result.behavior.should_proceed);
        assert!(!result.behavior.should_clarify);
        assert_eq!(result.behavior.action, BehaviorAction::ProceedSilently);
        assert!(result.message.is_none());
        assert_eq!(result.factors.title_match, 38);
        assert_eq!(result.factors.year_match, 20);
    }

    #[test]
    fn test_same_name_titles_are_ambiguous() {
        let candidates = vec![
            item(1, "Temper", 2015, 500, "te"),
            item(2, "Temper", 2016, 420, "hi"),
            item(3, "Temper", 2010, 300, "en"),
            item(4, "Temper", 2019, 250, "ko"),
        ];
        let reference = ExtractedReference::new("Temper", None);

        let result = ConfidenceScorer::new().score(&candidates, Some(&candidates[0]), &reference);

        assert_eq!(result.level, ConfidenceLevel::Ambiguous);
        assert!(!result.behavior.should_proceed);
        assert_eq!(result.behavior.action, BehaviorAction::AskDisambiguation);
        assert_eq!(result.behavior.alternatives.len(), 4);
        assert_eq!(result.behavior.alternatives[0].id, 1);

        let message = result.message.unwrap();
        assert!(message.contains("1. Temper (2015)"));
        assert!(message.contains("4. Temper"));
    }

    #[test]
    fn test_score_is_sum_of_factors() {
        let best = item(1, "Vikram", 2022, 3000, "ta");
        let candidates = vec![best.clone(), item(2, "Vikram Vedha", 2017, 1200, "ta")];
        let reference = ExtractedReference::new("Vikram", None);

        let result = ConfidenceScorer::new().score(&candidates, Some(&best), &reference);

        assert_eq!(result.score, result.factors.total());
        assert_eq!(result.factors.title_match, 40);
        assert_eq!(result.factors.year_match, 10);
        assert_eq!(result.factors.popularity, 16);
        assert_eq!(result.factors.uniqueness, 7);
        assert_eq!(result.factors.relevance, 10);
        assert_eq!(result.level, ConfidenceLevel::High);
        assert_eq!(result.badge.as_deref(), Some("83% match"));
    }

    #[test]
    fn test_no_candidates_asks_for_spelling() {
        let reference = ExtractedReference::new("Baahubalii", None);
        let result = ConfidenceScorer::new().score(&[], None, &reference);

        assert_eq!(result.level, ConfidenceLevel::Ambiguous);
        assert_eq!(result.score, 0);
        assert_eq!(result.behavior.action, BehaviorAction::CheckSpelling);
        assert!(result.message.unwrap().contains("check the spelling"));
    }

    #[test]
    fn test_low_confidence_offers_alternatives() {
        let best = item(1, "Kaithi Returns", 1990, 20, "ta");
        let candidates = vec![best.clone(), item(2, "Kaithi", 2019, 10, "ta")];
        let reference = ExtractedReference::new("Kaithi Story", Some(2019));

        let result = ConfidenceScorer::new().score(&candidates, Some(&best), &reference);

        assert_eq!(result.level, ConfidenceLevel::Low);
        assert!(result.behavior.should_proceed);
        assert!(result.behavior.should_clarify);
        assert_eq!(result.behavior.alternatives.len(), 1);
        assert!(result.message.unwrap().starts_with("Did you mean Kaithi Returns (1990)?"));
    }

    #[test]
    fn test_title_match_tiers() {
        assert_eq!(title_match_score("RRR", "rrr"), 40);
        assert_eq!(title_match_score("Dark Knight", "The Dark Knight"), 38);
        let partial = title_match_score("Dark Knight", "The Dark Knight Rises");
        assert!((25..=35).contains(&partial));
        assert_eq!(title_match_score("Eega", "Vikram"), 0);
    }

    #[test]
    fn test_year_match_never_increases_with_distance() {
        let mut previous = u32::MAX;
        for diff in 0..15u16 {
            let score = year_match_score(Some(2000), Some(2000 + diff));
            assert!(score <= previous, "year score rose at diff {}", diff);
            previous = score;
        }
        assert_eq!(year_match_score(None, Some(2000)), 10);
    }

    #[test]
    fn test_uniqueness_never_increases_with_alternatives() {
        let mut previous = u32::MAX;
        for count in 0..10 {
            let score = uniqueness_score(count);
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn test_weak_alternatives_are_not_strong() {
        let best = item(1, "Drishyam", 2013, 10_000, "ml");
        let candidates = vec![
            best.clone(),
            item(2, "Drishyam", 2015, 2_000, "hi"), // below 30%
            item(3, "Drishyam", 2021, 50, "te"),    // below 100 votes
            item(4, "Drishyam", 2022, 3_500, "hi"),
        ];
        assert_eq!(count_strong_alternatives(&candidates, &best), 1);
    }

    #[test]
    fn test_level_thresholds() {
        let cases = [
            (100, ConfidenceLevel::Exact),
            (90, ConfidenceLevel::Exact),
            (89, ConfidenceLevel::High),
            (75, ConfidenceLevel::High),
            (74, ConfidenceLevel::Medium),
            (55, ConfidenceLevel::Medium),
            (54, ConfidenceLevel::Low),
            (35, ConfidenceLevel::Low),
            (34, ConfidenceLevel::Ambiguous),
            (0, ConfidenceLevel::Ambiguous),
        ];
        for (score, expected) in cases {
            assert_eq!(ConfidenceLevel::from_score(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_exact_title_and_year_beats_strong_alternatives() {
        let candidates = vec![
            item(1, "Temper", 2015, 500, "te"),
            item(2, "Temper", 2016, 420, "hi"),
            item(3, "Temper", 2010, 300, "en"),
            item(4, "Temper", 2019, 250, "ko"),
        ];
        assert_eq!(count_strong_alternatives(&candidates, &candidates[0]), 3);

        let with_year = ExtractedReference::new("Temper", Some(2015));
        let result = ConfidenceScorer::new().score(&candidates, Some(&candidates[0]), &with_year);
        assert_eq!(result.level, ConfidenceLevel::Exact);
        assert!(result.behavior.should_proceed);
        assert!(result.behavior.alternatives.is_empty());

        // One year off: the alternatives override applies instead
        let near_year = ExtractedReference::new("Temper", Some(2016));
        let result = ConfidenceScorer::new().score(&candidates, Some(&candidates[0]), &near_year);
        assert_eq!(result.level, ConfidenceLevel::Ambiguous);
        assert!(!result.behavior.should_proceed);
    }

    #[test]
    fn test_behavior_per_level() {
        let cases = [
            (ConfidenceLevel::Exact, true, false, Strictness::Strict, BehaviorAction::ProceedSilently),
            (ConfidenceLevel::High, true, false, Strictness::Strict, BehaviorAction::ShowBadge),
            (ConfidenceLevel::Medium, true, false, Strictness::Moderate, BehaviorAction::SoftConfirm),
            (ConfidenceLevel::Low, true, true, Strictness::Flexible, BehaviorAction::AskConfirmation),
            (ConfidenceLevel::Ambiguous, false, true, Strictness::Flexible, BehaviorAction::AskDisambiguation),
        ];
        for (level, proceed, clarify, strictness, action) in cases {
            let behavior = behavior_for(level, Vec::new());
            assert_eq!(behavior.should_proceed, proceed, "{:?}", level);
            assert_eq!(behavior.should_clarify, clarify, "{:?}", level);
            assert_eq!(behavior.strictness, strictness, "{:?}", level);
            assert_eq!(behavior.action, action, "{:?}", level);
        }
    }
}
