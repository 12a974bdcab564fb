//! Filters applying [`CulturalFilterRules`](crate::rules::CulturalFilterRules)
//! to profiled candidates.

pub mod language;
pub mod mass_appeal;
pub mod reference_exclusion;
pub mod style_match;
pub mod theme;

pub use language::LanguageFilter;
pub use mass_appeal::MassAppealFilter;
pub use reference_exclusion::ReferenceExclusionFilter;
pub use style_match::StyleMatchFilter;
pub use theme::ThemeFilter;
