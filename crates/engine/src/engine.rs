//! # Recommendation Engine
//!
//! Coordinates a "titles like X" request end to end:
//! 1. Extract the reference from the message
//! 2. Resolve it against the catalog and calibrate confidence
//! 3. Profile the reference and generate its filter rules
//! 4. Profile and filter the candidate pool (strict, then relaxed)
//! 5. Score reference similarity
//! 6. Personalize and rank with the diversity quota
//!
//! Gateway failures never fail a request. Failed searches resolve to "no
//! candidates" and failed detail lookups fall back to search metadata.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use catalog::{CandidateItem, CatalogGateway, ItemDetails};
use learning::{
    FeedbackTarget, MovieAttributes, PersonalizationScore, PreferenceLearningState, RankingCandidate,
    rank_with_diversity,
};
use profiler::filters::ReferenceExclusionFilter;
use profiler::{
    CinematicProfiler, CulturalContext, CulturalFilterRules, FilterPipeline, ProfileInput, ProfiledCandidate,
};
use resolver::{
    ConfidenceScore, ConfidenceScorer, ExtractedReference, ReferenceExtractor, ReferenceResolver,
    ResolvedReference, Strictness,
};

use crate::config::EngineConfig;
use crate::similarity::{SimilarityBreakdown, SimilarityScorer};

/// A reference resolved against the catalog, with its confidence
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reference: ExtractedReference,
    /// `None` when the catalog had nothing under that title
    pub resolved: Option<ResolvedReference>,
    pub confidence: ConfidenceScore,
}

impl Resolution {
    /// Whether recommendations should be produced without asking first
    pub fn should_proceed(&self) -> bool {
        self.resolved.is_some() && self.confidence.behavior.should_proceed
    }
}

/// Profile and filter template of a resolved reference
#[derive(Debug, Clone)]
pub struct ReferenceAnalysis {
    pub reference: ProfiledCandidate,
    /// `None` when the detail lookup failed
    pub details: Option<ItemDetails>,
    pub rules: CulturalFilterRules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Strict,
    Relaxed,
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub candidate: ProfiledCandidate,
    pub similarity: SimilarityBreakdown,
    pub score: PersonalizationScore,
}

#[derive(Debug, Clone)]
pub struct RecommendationSet {
    pub mode: FilterMode,
    /// Pool size before filtering
    pub considered: usize,
    /// Candidates that passed the filters
    pub matched: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Everything produced for one message
#[derive(Debug, Clone)]
pub struct RecommendOutcome {
    pub resolution: Resolution,
    pub analysis: Option<ReferenceAnalysis>,
    /// `None` when the reference needs clarification first
    pub recommendations: Option<RecommendationSet>,
}

/// Candidate carried through ranking
struct SimilarCandidate {
    candidate: ProfiledCandidate,
    attributes: MovieAttributes,
    similarity: SimilarityBreakdown,
}

impl RankingCandidate for SimilarCandidate {
    fn attributes(&self) -> &MovieAttributes {
        &self.attributes
    }

    fn reference_score(&self) -> f64 {
        self.similarity.total()
    }
}

/// Main engine tying resolver, profiler and learning together
#[derive(Clone)]
pub struct RecommendationEngine {
    gateway: Arc<dyn CatalogGateway>,
    extractor: ReferenceExtractor,
    resolver: ReferenceResolver,
    confidence: ConfidenceScorer,
    profiler: CinematicProfiler,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(gateway: Arc<dyn CatalogGateway>, profiler: CinematicProfiler, config: EngineConfig) -> Self {
        let resolver = ReferenceResolver::new(gateway.clone()).with_search_pages(config.search_pages);
        Self {
            gateway,
            extractor: ReferenceExtractor::default(),
            resolver,
            confidence: ConfidenceScorer::new(),
            profiler,
            config,
        }
    }

    /// Replace the reference extractor (pins the current year in tests)
    pub fn with_extractor(mut self, extractor: ReferenceExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_confidence_scorer(mut self, confidence: ConfidenceScorer) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profiler(&self) -> &CinematicProfiler {
        &self.profiler
    }

    /// Pull the reference out of a message.
    ///
    /// Messages that match no "like X" phrasing are taken as a bare title.
    pub fn extract(&self, text: &str) -> Option<ExtractedReference> {
        if let Some(reference) = self.extractor.extract(text) {
            return Some(reference);
        }
        let (title, year) = self.extractor.split_year(text.trim());
        if title.is_empty() {
            None
        } else {
            Some(ExtractedReference::new(title, year))
        }
    }

    /// Resolve an extracted reference and score the confidence
    #[instrument(skip(self, reference), fields(title = %reference.title))]
    pub async fn resolve(&self, reference: ExtractedReference) -> Resolution {
        let resolved = self.resolver.find_reference_item(&reference.title, reference.year).await;
        let confidence = match &resolved {
            Some(resolved) => self
                .confidence
                .score(&resolved.candidates, Some(&resolved.item), &reference),
            None => self.confidence.score(&[], None, &reference),
        };
        info!(
            "Resolved '{}' to {:?} with {:?} confidence ({})",
            reference.title,
            resolved.as_ref().map(|r| r.item.display_title()),
            confidence.level,
            confidence.score
        );
        Resolution {
            reference,
            resolved,
            confidence,
        }
    }

    /// Extract and resolve in one step
    pub async fn resolve_message(&self, text: &str) -> Option<Resolution> {
        let reference = self.extract(text)?;
        Some(self.resolve(reference).await)
    }

    /// Profile a resolved reference and derive its filter rules
    #[instrument(skip(self, resolved), fields(id = resolved.item.id))]
    pub async fn analyze(&self, resolved: &ResolvedReference) -> ReferenceAnalysis {
        let item = resolved.item.clone();
        let details = match self.gateway.get_details(item.id, item.media_type).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(
                    gateway = self.gateway.name(),
                    error = %e,
                    "Detail lookup failed for {}, using search metadata",
                    item.display_title()
                );
                None
            }
        };

        let culture = CulturalContext::detect(&item, details.as_ref());
        let input = ProfileInput::from_item(&item, &culture).with_details(details.as_ref());
        let profile = self.profiler.build_profile(&input);
        let rules = CulturalFilterRules::from_profile(&profile, &culture);
        info!(
            "Profiled {}: {} / {} / {} (mass appeal {})",
            item.display_title(),
            profile.narrative_scale,
            profile.storytelling_style,
            profile.audience_type,
            profile.mass_appeal_score
        );

        ReferenceAnalysis {
            reference: ProfiledCandidate { item, culture, profile },
            details,
            rules,
        }
    }

    /// Filter, score and rank a candidate pool against an analyzed reference.
    ///
    /// The reference and every title already rated in `state` are excluded.
    /// When the strict chain keeps fewer than `min_strict_results` the
    /// relaxed chain is used instead. A `Flexible` strictness starts relaxed.
    pub fn rank_candidates(
        &self,
        analysis: &ReferenceAnalysis,
        pool: Vec<CandidateItem>,
        state: &PreferenceLearningState,
        strictness: Strictness,
    ) -> Result<RecommendationSet> {
        let start_time = Instant::now();
        let exclusion_keys: Vec<_> = std::iter::once(analysis.reference.item.key())
            .chain(state.rated_keys())
            .collect();

        let profiled = self.profiler.profile_candidates(pool);
        let considered = profiled.len();

        let (mode, matched) = if strictness == Strictness::Flexible {
            (FilterMode::Relaxed, self.apply_relaxed(profiled, analysis, exclusion_keys)?)
        } else {
            let strict = FilterPipeline::strict(ReferenceExclusionFilter::new(exclusion_keys.clone()))
                .apply(profiled.clone(), &analysis.rules)
                .context("Strict filter chain failed")?;
            if strict.len() >= self.config.min_strict_results {
                (FilterMode::Strict, strict)
            } else {
                info!(
                    "Strict filters kept {} of {} candidates, relaxing",
                    strict.len(),
                    considered
                );
                (FilterMode::Relaxed, self.apply_relaxed(profiled, analysis, exclusion_keys)?)
            }
        };
        let matched_count = matched.len();

        let similarities = SimilarityScorer::new(&analysis.reference, &analysis.rules).score_all(&matched);
        let ranking_input: Vec<SimilarCandidate> = matched
            .into_iter()
            .zip(similarities)
            .map(|(candidate, similarity)| SimilarCandidate {
                attributes: MovieAttributes::from_profiled(&candidate),
                candidate,
                similarity,
            })
            .collect();

        let mut ranked = rank_with_diversity(ranking_input, state, &self.config.ranking());
        ranked.truncate(self.config.candidate_limit);

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .map(|r| Recommendation {
                candidate: r.item.candidate,
                similarity: r.item.similarity,
                score: r.score,
            })
            .collect();

        info!(
            "Ranked {} recommendations ({:?} filters, {} of {} matched) in {:.2?}",
            recommendations.len(),
            mode,
            matched_count,
            considered,
            start_time.elapsed()
        );

        Ok(RecommendationSet {
            mode,
            considered,
            matched: matched_count,
            recommendations,
        })
    }

    /// Full request: resolve the message, then rank `pool` if confident enough
    pub async fn recommend(
        &self,
        text: &str,
        pool: Vec<CandidateItem>,
        state: &PreferenceLearningState,
    ) -> Result<Option<RecommendOutcome>> {
        let Some(resolution) = self.resolve_message(text).await else {
            return Ok(None);
        };

        let resolved = match &resolution.resolved {
            Some(resolved) if resolution.should_proceed() => resolved.clone(),
            _ => {
                return Ok(Some(RecommendOutcome {
                    resolution,
                    analysis: None,
                    recommendations: None,
                }));
            }
        };

        let analysis = self.analyze(&resolved).await;
        let recommendations =
            self.rank_candidates(&analysis, pool, state, resolution.confidence.behavior.strictness)?;

        Ok(Some(RecommendOutcome {
            resolution,
            analysis: Some(analysis),
            recommendations: Some(recommendations),
        }))
    }

    /// Profile a title into the snapshot stored with its feedback
    pub fn feedback_target(&self, item: &CandidateItem) -> FeedbackTarget {
        let culture = CulturalContext::detect(item, None);
        let profile = self.profiler.profile_item(item, &culture);
        FeedbackTarget::from_profiled(&ProfiledCandidate {
            item: item.clone(),
            culture,
            profile,
        })
    }

    fn apply_relaxed(
        &self,
        profiled: Vec<ProfiledCandidate>,
        analysis: &ReferenceAnalysis,
        exclusion_keys: Vec<(catalog::MediaType, catalog::MediaId)>,
    ) -> Result<Vec<ProfiledCandidate>> {
        FilterPipeline::relaxed(ReferenceExclusionFilter::new(exclusion_keys))
            .apply(profiled, &analysis.rules)
            .context("Relaxed filter chain failed")
    }
}
