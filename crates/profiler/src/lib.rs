//! Cinematic profiling and cultural filtering of reference titles.
//!
//! This crate provides:
//! - `CinematicProfiler` deriving a structured profile from catalog metadata
//! - `KnownTitles`, the curated reference table injected into the profiler
//! - `CulturalContext` language/industry detection
//! - `CulturalFilterRules` generated from a reference profile
//! - `Filter` trait and `FilterPipeline` applying those rules to candidates
//!
//! ## Architecture
//! A resolved reference flows through:
//! 1. `CulturalContext::detect` classifies language, countries and industry
//! 2. `CinematicProfiler::build_profile` derives scale, style, audience,
//!    mass appeal, themes, production scale and era
//! 3. `CulturalFilterRules::from_profile` turns the profile into hard
//!    include/exclude sets and soft era preferences
//! 4. `FilterPipeline` keeps the candidates that satisfy the rules
//!
//! ## Example Usage
//! ```ignore
//! use profiler::{CinematicProfiler, CulturalContext, CulturalFilterRules, FilterPipeline};
//! use profiler::filters::ReferenceExclusionFilter;
//!
//! let profiler = CinematicProfiler::default();
//! let culture = CulturalContext::detect(&reference, Some(&details));
//! let profile = profiler.profile_item(&reference, &culture);
//! let rules = CulturalFilterRules::from_profile(&profile, &culture);
//!
//! let pipeline = FilterPipeline::strict(ReferenceExclusionFilter::new([reference.key()]));
//! let matches = pipeline.apply(profiler.profile_candidates(candidates), &rules)?;
//! ```

pub mod culture;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod keywords;
pub mod known_titles;
pub mod profiler;
pub mod rules;
pub mod traits;
pub mod types;

pub use culture::{CulturalContext, Industry};
pub use error::{ProfilerError, Result};
pub use filter_pipeline::FilterPipeline;
pub use known_titles::{KnownProfile, KnownTitles};
pub use profiler::CinematicProfiler;
pub use rules::{CulturalFilterRules, EraFlexibility, LanguagePolicy, build_filters};
pub use traits::Filter;
pub use types::{
    AudienceType, CinematicProfile, NarrativeScale, ProductionScale, ProfileInput,
    ProfiledCandidate, ReleaseEra, StorytellingStyle, ThematicTag,
};
