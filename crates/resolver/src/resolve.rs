//! Reference resolution against the catalog.
//!
//! ## Algorithm
//! 1. Search movies for the extracted title
//! 2. Score every result (title tier + year closeness + popularity bonuses)
//! 3. If the best movie is a strong match, stop; otherwise search series too
//!    and keep whichever side has the higher best score (movies win ties)
//! 4. The best candidate scoring above 20 wins. If nothing clears that bar
//!    the top raw search result is returned with `Low` confidence so the
//!    conversation can still move forward

use crate::matching::TitleTier;
use catalog::{CandidateItem, CatalogGateway, MediaType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Best-movie score at which series are not searched at all
pub const STRONG_MATCH_SCORE: u32 = 80;

/// Minimum score for a candidate to be accepted as the best match
pub const MIN_MATCH_SCORE: u32 = 20;

/// Coarse confidence tag attached by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTag {
    Low,
    Medium,
    High,
    Exact,
}

impl MatchTag {
    /// Tag from the title tier, raised to `High` when the year matched exactly
    pub fn from_match(tier: TitleTier, exact_year: bool) -> Self {
        let base = match tier {
            TitleTier::Exact => MatchTag::Exact,
            TitleTier::Prefix => MatchTag::High,
            TitleTier::Substring => MatchTag::Medium,
            TitleTier::Fuzzy | TitleTier::WeakFuzzy | TitleTier::None => MatchTag::Low,
        };
        if exact_year { base.max(MatchTag::High) } else { base }
    }
}

/// A search result with its resolution score
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub item: CandidateItem,
    pub score: u32,
    pub tier: TitleTier,
    pub exact_year: bool,
}

/// Outcome of resolving a title against the catalog
#[derive(Debug, Clone)]
pub struct ResolvedReference {
    pub item: CandidateItem,
    pub media_type: MediaType,
    pub confidence: MatchTag,
    pub score: u32,
    /// Other candidates, best first
    pub alternatives: Vec<CandidateItem>,
    /// Every search result of the chosen media type, in search order
    pub candidates: Vec<CandidateItem>,
}

/// Resolves extracted titles into catalog items
#[derive(Clone)]
pub struct ReferenceResolver {
    gateway: Arc<dyn CatalogGateway>,
    search_pages: u32,
}

impl ReferenceResolver {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            search_pages: 1,
        }
    }

    /// Configure how many search pages are read per media type (default: 1)
    pub fn with_search_pages(mut self, pages: u32) -> Self {
        self.search_pages = pages.max(1);
        self
    }

    /// Find the catalog item a title refers to.
    ///
    /// Returns `None` only when neither movies nor series produced any result
    /// (including when the gateway failed).
    #[instrument(skip(self), fields(gateway = self.gateway.name()))]
    pub async fn find_reference_item(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Option<ResolvedReference> {
        let movies = self.search(title, MediaType::Movie).await;
        let movie_ranked = rank_candidates(title, year, &movies);

        let movie_best = movie_ranked.first().map(|c| c.score).unwrap_or(0);
        if !movie_ranked.is_empty() && movie_best >= STRONG_MATCH_SCORE {
            debug!("Strong movie match (score {}), skipping series", movie_best);
            return resolve_from(movie_ranked, movies, MediaType::Movie);
        }

        let series = self.search(title, MediaType::Series).await;
        let series_ranked = rank_candidates(title, year, &series);
        let series_best = series_ranked.first().map(|c| c.score).unwrap_or(0);

        if !series_ranked.is_empty() && (movie_ranked.is_empty() || series_best > movie_best) {
            resolve_from(series_ranked, series, MediaType::Series)
        } else {
            resolve_from(movie_ranked, movies, MediaType::Movie)
        }
    }

    /// Collect search results across pages; failures degrade to no results
    async fn search(&self, title: &str, media_type: MediaType) -> Vec<CandidateItem> {
        let mut results = Vec::new();
        for page in 1..=self.search_pages {
            match self.gateway.search_titles(title, media_type, page).await {
                Ok(found) => {
                    let total_pages = found.total_pages;
                    results.extend(found.results);
                    if page >= total_pages {
                        break;
                    }
                }
                Err(e) => {
                    warn!(
                        gateway = self.gateway.name(),
                        error = %e,
                        "Catalog search failed for '{}' ({})",
                        title,
                        media_type
                    );
                    break;
                }
            }
        }
        results
    }
}

/// Score and sort candidates, best first
pub fn rank_candidates(
    title: &str,
    year: Option<u16>,
    candidates: &[CandidateItem],
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|item| score_candidate(title, year, item))
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.item.vote_count.cmp(&a.item.vote_count))
    });
    scored
}

/// Resolution score for one candidate
pub fn score_candidate(title: &str, year: Option<u16>, item: &CandidateItem) -> ScoredCandidate {
    let tier = TitleTier::classify(title, &item.title);
    let mut score = tier.points();

    let mut exact_year = false;
    if let (Some(wanted), Some(released)) = (year, item.release_year) {
        let diff = (wanted as i32 - released as i32).abs();
        score += match diff {
            0 => 30,
            1 => 15,
            2..=3 => 5,
            _ => 0,
        };
        exact_year = diff == 0;
    }

    // Small bonuses that only break ties between similar titles
    score += (item.popularity / 20.0).clamp(0.0, 5.0) as u32;
    score += (item.vote_count / 2000).min(5);

    ScoredCandidate {
        item: item.clone(),
        score,
        tier,
        exact_year,
    }
}

fn resolve_from(
    ranked: Vec<ScoredCandidate>,
    raw: Vec<CandidateItem>,
    media_type: MediaType,
) -> Option<ResolvedReference> {
    let best = ranked.first()?;

    let (item, confidence, score) = if best.score > MIN_MATCH_SCORE {
        (
            best.item.clone(),
            MatchTag::from_match(best.tier, best.exact_year),
            best.score,
        )
    } else {
        // Nothing convincing: fall back to the catalog's own top result
        let top = raw.first()?.clone();
        let score = ranked
            .iter()
            .find(|c| c.item.key() == top.key())
            .map(|c| c.score)
            .unwrap_or(0);
        (top, MatchTag::Low, score)
    };

    let alternatives = ranked
        .into_iter()
        .filter(|c| c.item.key() != item.key())
        .map(|c| c.item)
        .collect();

    debug!(
        "Resolved '{}' ({}) with {:?} confidence, score {}",
        item.title, media_type, confidence, score
    );

    Some(ResolvedReference {
        item,
        media_type,
        confidence,
        score,
        alternatives,
        candidates: raw,
    })
}
