//! # Resolver Crate
//!
//! Turns a free-text request into a catalog item and says how sure it is.
//!
//! ## Components
//!
//! ### Extraction
//! Finds the anchor title in phrasings such as "movies like X",
//! "similar to X" or "fans of X", and pulls out an embedded year in
//! `(2015)`, `[2015]`, `, 2015` or trailing form.
//!
//! ### Resolution
//! Searches movies first and falls back to series when the best movie is
//! not a strong match. Candidates are ranked by title tier, year closeness
//! and small popularity tie-breakers.
//!
//! ### Confidence
//! Five factors (title, year, popularity, uniqueness, relevance) sum to a
//! 0-100 score mapped to exact / high / medium / low / ambiguous, each with
//! a fixed behavior contract.
//!
//! ## Example Usage
//!
//! ```ignore
//! use resolver::{ConfidenceScorer, ReferenceExtractor, ReferenceResolver};
//! use std::sync::Arc;
//!
//! let reference = ReferenceExtractor::default().extract("movies like Baahubali (2015)")?;
//! let resolver = ReferenceResolver::new(Arc::new(catalog));
//! let resolved = resolver.find_reference_item(&reference.title, reference.year).await?;
//! let confidence = ConfidenceScorer::new().score(&resolved.candidates, Some(&resolved.item), &reference);
//! ```

pub mod confidence;
pub mod extract;
pub mod matching;
pub mod resolve;

pub use confidence::{
    Alternative, Behavior, BehaviorAction, ConfidenceFactors, ConfidenceLevel, ConfidenceScore,
    ConfidenceScorer, Strictness,
};
pub use extract::{ExtractedReference, ReferenceExtractor, resolve_reference};
pub use matching::TitleTier;
pub use resolve::{MatchTag, ReferenceResolver, ResolvedReference, ScoredCandidate};
