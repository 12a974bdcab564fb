//! # Engine Crate
//!
//! Orchestrates a recommendation request across the resolver, profiler and
//! learning crates.
//!
//! ## Main Components
//!
//! - **engine**: `RecommendationEngine` and the request/response types
//! - **similarity**: Reference-similarity score personalization starts from
//! - **config**: `EngineConfig` and the combined `Settings` file
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{EngineConfig, RecommendationEngine};
//! use std::sync::Arc;
//!
//! let engine = RecommendationEngine::new(Arc::new(catalog), CinematicProfiler::default(), EngineConfig::default());
//! if let Some(outcome) = engine.recommend("movies like Baahubali", pool, &state).await? {
//!     println!("{:?}", outcome.resolution.confidence.level);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod similarity;

pub use config::{EngineConfig, Settings};
pub use engine::{
    FilterMode, Recommendation, RecommendOutcome, RecommendationEngine, RecommendationSet,
    ReferenceAnalysis, Resolution,
};
pub use similarity::{SimilarityBreakdown, SimilarityScorer};
