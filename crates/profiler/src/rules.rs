//! Cultural filter rule generation.
//!
//! Turns a reference profile into the template candidate recommendations
//! are matched against. Language and country sets are hard filters;
//! preferred languages and era are soft signals only.

use crate::culture::CulturalContext;
use crate::types::{
    AudienceType, CinematicProfile, NarrativeScale, ProductionScale, ReleaseEra,
    StorytellingStyle, ThematicTag,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mass appeal at which regional cinema admits other regional languages
pub const RELAXED_LANGUAGE_MASS_APPEAL: u8 = 85;

/// Countries excluded for regional-language references
const ENGLISH_PRODUCTION_COUNTRIES: &[&str] = &["US", "GB"];

/// How the reference's language constrains candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguagePolicy {
    /// Only the reference language is allowed
    ExactLanguage,
    /// Anything except English-language productions
    ExcludeEnglish,
    /// No hard language restriction
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraFlexibility {
    Strict,
    Moderate,
    Flexible,
}

/// Filter template derived from a reference profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalFilterRules {
    pub language_policy: LanguagePolicy,
    pub include_languages: BTreeSet<String>,
    pub exclude_languages: BTreeSet<String>,
    pub include_countries: BTreeSet<String>,
    pub exclude_countries: BTreeSet<String>,
    /// Ranking boost only, never a filter
    pub preferred_languages: Vec<String>,

    pub required_narrative_scales: Vec<NarrativeScale>,
    pub required_styles: Vec<StorytellingStyle>,
    pub required_audiences: Vec<AudienceType>,

    pub min_mass_appeal: u8,
    pub min_production_scale: ProductionScale,

    /// Candidates must carry at least one of these (empty = no requirement)
    pub required_themes: Vec<ThematicTag>,
    pub preferred_themes: Vec<ThematicTag>,

    pub era_flexibility: EraFlexibility,
    pub reference_era: ReleaseEra,
}

impl CulturalFilterRules {
    /// Generate the rules for a reference
    pub fn from_profile(profile: &CinematicProfile, culture: &CulturalContext) -> Self {
        let language = culture.language.clone();
        let mut include_languages = BTreeSet::new();
        let mut exclude_languages = BTreeSet::new();
        let mut exclude_countries = BTreeSet::new();

        let (language_policy, preferred_languages) = if culture.is_regional_cinema {
            exclude_countries.extend(ENGLISH_PRODUCTION_COUNTRIES.iter().map(|c| c.to_string()));
            if profile.mass_appeal_score >= RELAXED_LANGUAGE_MASS_APPEAL {
                exclude_languages.insert("en".to_string());
                (LanguagePolicy::ExcludeEnglish, vec![language.clone()])
            } else {
                include_languages.insert(language.clone());
                (LanguagePolicy::ExactLanguage, vec![language.clone()])
            }
        } else if culture.is_east_asian() {
            include_languages.insert(language.clone());
            (LanguagePolicy::ExactLanguage, vec![language.clone()])
        } else if culture.is_mainstream_english {
            (LanguagePolicy::Open, vec!["en".to_string()])
        } else {
            (LanguagePolicy::Open, vec![language.clone()])
        };

        let required_themes: Vec<ThematicTag> = if demands_core_themes(profile) {
            profile.themes.iter().copied().filter(ThematicTag::is_core).collect()
        } else {
            Vec::new()
        };
        let preferred_themes = profile
            .themes
            .iter()
            .copied()
            .filter(|t| !required_themes.contains(t))
            .collect();

        Self {
            language_policy,
            include_languages,
            exclude_languages,
            include_countries: BTreeSet::new(),
            exclude_countries,
            preferred_languages,
            required_narrative_scales: allowed_scales(profile.narrative_scale),
            required_styles: allowed_styles(profile.storytelling_style),
            required_audiences: allowed_audiences(profile.audience_type),
            min_mass_appeal: min_mass_appeal(profile.mass_appeal_score),
            min_production_scale: profile.production_scale.one_below(),
            required_themes,
            preferred_themes,
            era_flexibility: era_flexibility(profile),
            reference_era: profile.release_era,
        }
    }

    /// Hard language/country check
    pub fn allows_language(&self, language: &str, countries: &[String]) -> bool {
        let language = language.to_lowercase();
        if !self.include_languages.is_empty() && !self.include_languages.contains(&language) {
            return false;
        }
        if self.exclude_languages.contains(&language) {
            return false;
        }
        if !self.include_countries.is_empty()
            && !countries.iter().any(|c| self.include_countries.contains(c))
        {
            return false;
        }
        !countries.iter().any(|c| self.exclude_countries.contains(c))
    }

    pub fn is_preferred_language(&self, language: &str) -> bool {
        self.preferred_languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    /// Soft era proximity in `[0, 1]`; unknown eras score a neutral 0.5
    pub fn era_similarity(&self, era: ReleaseEra) -> f32 {
        let (Some(a), Some(b)) = (self.reference_era.ordinal(), era.ordinal()) else {
            return 0.5;
        };
        let distance = a.abs_diff(b);
        match (self.era_flexibility, distance) {
            (_, 0) => 1.0,
            (EraFlexibility::Strict, 1) => 0.5,
            (EraFlexibility::Strict, 2) => 0.2,
            (EraFlexibility::Strict, _) => 0.0,
            (EraFlexibility::Moderate, 1) => 0.75,
            (EraFlexibility::Moderate, 2) => 0.5,
            (EraFlexibility::Moderate, 3) => 0.25,
            (EraFlexibility::Moderate, _) => 0.1,
            (EraFlexibility::Flexible, d) => 1.0 - 0.1 * d as f32,
        }
    }
}

/// Convenience wrapper over [`CulturalFilterRules::from_profile`]
pub fn build_filters(profile: &CinematicProfile, culture: &CulturalContext) -> CulturalFilterRules {
    CulturalFilterRules::from_profile(profile, culture)
}

fn demands_core_themes(profile: &CinematicProfile) -> bool {
    profile.storytelling_style == StorytellingStyle::CommercialMass
        || profile.narrative_scale == NarrativeScale::Epic
}

/// Reference scale to the scales a match may have
pub fn allowed_scales(scale: NarrativeScale) -> Vec<NarrativeScale> {
    use NarrativeScale::*;
    match scale {
        Epic => vec![Epic, Large],
        Large => vec![Epic, Large, Medium],
        Medium => vec![Large, Medium, Intimate],
        Intimate => vec![Medium, Intimate],
        Unknown => vec![Epic, Large, Medium, Intimate, Unknown],
    }
}

pub fn allowed_styles(style: StorytellingStyle) -> Vec<StorytellingStyle> {
    use StorytellingStyle::*;
    match style {
        CommercialMass => vec![CommercialMass, ActionSpectacle],
        ActionSpectacle => vec![ActionSpectacle, CommercialMass],
        EmotionalDrama => vec![EmotionalDrama, ArtHouse],
        ThrillerSuspense => vec![ThrillerSuspense, ActionSpectacle],
        Comedy => vec![Comedy, Mixed],
        ArtHouse => vec![ArtHouse, EmotionalDrama],
        Mixed => vec![
            CommercialMass,
            ActionSpectacle,
            EmotionalDrama,
            ThrillerSuspense,
            Comedy,
            ArtHouse,
            Mixed,
        ],
    }
}

pub fn allowed_audiences(audience: AudienceType) -> Vec<AudienceType> {
    use AudienceType::*;
    match audience {
        Mass => vec![Mass, Universal],
        Family => vec![Family, Universal],
        Youth => vec![Youth, Universal],
        Mature => vec![Mature, Niche],
        Niche => vec![Niche, Mature],
        Universal => vec![Universal, Mass, Family, Youth],
    }
}

/// High-profile references demand high-profile matches
pub fn min_mass_appeal(reference_appeal: u8) -> u8 {
    match reference_appeal {
        90.. => 75,
        80..=89 => 65,
        70..=79 => 55,
        _ => 40,
    }
}

pub fn era_flexibility(profile: &CinematicProfile) -> EraFlexibility {
    match (profile.release_era, profile.storytelling_style) {
        (ReleaseEra::Recent, _) if profile.mass_appeal_score >= 80 => EraFlexibility::Strict,
        (ReleaseEra::Classic, _) | (_, StorytellingStyle::ArtHouse) => EraFlexibility::Flexible,
        _ => EraFlexibility::Moderate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::Industry;

    fn profile(scale: NarrativeScale, style: StorytellingStyle, appeal: u8, year: u16) -> CinematicProfile {
        CinematicProfile {
            narrative_scale: scale,
            storytelling_style: style,
            audience_type: AudienceType::Mass,
            mass_appeal_score: appeal,
            themes: vec![ThematicTag::MassHero, ThematicTag::Family, ThematicTag::Revenge],
            production_scale: ProductionScale::Big,
            release_era: ReleaseEra::from_year(Some(year)),
            release_year: Some(year),
            has_epic_scope: scale == NarrativeScale::Epic,
            has_mass_hero: true,
            has_patriotic_theme: false,
            has_revenge_theme: true,
            has_mythology: false,
        }
    }

    fn culture(language: &str, regional: bool) -> CulturalContext {
        CulturalContext {
            language: language.to_string(),
            countries: vec![],
            is_regional_cinema: regional,
            is_korean: language == "ko",
            is_japanese: language == "ja",
            is_chinese: language == "zh",
            is_mainstream_english: language == "en",
            industry: Industry::Other,
        }
    }

    #[test]
    fn test_regional_low_appeal_requires_exact_language() {
        let rules = CulturalFilterRules::from_profile(
            &profile(NarrativeScale::Large, StorytellingStyle::CommercialMass, 70, 2016),
            &culture("te", true),
        );
        assert_eq!(rules.language_policy, LanguagePolicy::ExactLanguage);
        assert!(rules.allows_language("te", &["IN".to_string()]));
        assert!(!rules.allows_language("ta", &["IN".to_string()]));
        assert!(!rules.allows_language("te", &["US".to_string()]));
    }

    #[test]
    fn test_regional_high_appeal_excludes_english_only() {
        let rules = CulturalFilterRules::from_profile(
            &profile(NarrativeScale::Epic, StorytellingStyle::CommercialMass, 95, 2015),
            &culture("te", true),
        );
        assert_eq!(rules.language_policy, LanguagePolicy::ExcludeEnglish);
        assert!(rules.allows_language("ta", &["IN".to_string()]));
        assert!(rules.allows_language("hi", &[]));
        assert!(!rules.allows_language("en", &["IN".to_string()]));
        assert!(!rules.allows_language("hi", &["GB".to_string()]));
        assert!(rules.is_preferred_language("TE"));
    }

    #[test]
    fn test_mainstream_english_is_open() {
        let rules = CulturalFilterRules::from_profile(
            &profile(NarrativeScale::Large, StorytellingStyle::ActionSpectacle, 85, 2012),
            &culture("en", false),
        );
        assert_eq!(rules.language_policy, LanguagePolicy::Open);
        assert!(rules.allows_language("ko", &["KR".to_string()]));
        assert_eq!(rules.preferred_languages, vec!["en"]);
        assert!(rules.required_themes.is_empty());
        assert_eq!(rules.preferred_themes.len(), 3);
    }

    #[test]
    fn test_core_themes_required_for_commercial_mass() {
        let rules = CulturalFilterRules::from_profile(
            &profile(NarrativeScale::Large, StorytellingStyle::CommercialMass, 85, 2012),
            &culture("hi", true),
        );
        assert_eq!(rules.required_themes, vec![ThematicTag::MassHero, ThematicTag::Revenge]);
        assert_eq!(rules.preferred_themes, vec![ThematicTag::Family]);
    }

    #[test]
    fn test_mass_appeal_thresholds() {
        assert_eq!(min_mass_appeal(95), 75);
        assert_eq!(min_mass_appeal(90), 75);
        assert_eq!(min_mass_appeal(80), 65);
        assert_eq!(min_mass_appeal(70), 55);
        assert_eq!(min_mass_appeal(69), 40);
    }

    #[test]
    fn test_category_tables_keep_reference_value() {
        for scale in [
            NarrativeScale::Epic,
            NarrativeScale::Large,
            NarrativeScale::Medium,
            NarrativeScale::Intimate,
            NarrativeScale::Unknown,
        ] {
            assert!(allowed_scales(scale).contains(&scale));
        }
        assert_eq!(
            allowed_styles(StorytellingStyle::CommercialMass),
            vec![StorytellingStyle::CommercialMass, StorytellingStyle::ActionSpectacle]
        );
    }

    #[test]
    fn test_era_flexibility_and_similarity() {
        let recent = profile(NarrativeScale::Epic, StorytellingStyle::CommercialMass, 90, 2022);
        assert_eq!(era_flexibility(&recent), EraFlexibility::Strict);

        let classic = profile(NarrativeScale::Large, StorytellingStyle::CommercialMass, 90, 1975);
        assert_eq!(era_flexibility(&classic), EraFlexibility::Flexible);

        let middling = profile(NarrativeScale::Large, StorytellingStyle::Comedy, 60, 2022);
        assert_eq!(era_flexibility(&middling), EraFlexibility::Moderate);

        let rules = CulturalFilterRules::from_profile(&recent, &culture("te", true));
        assert_eq!(rules.era_similarity(ReleaseEra::Recent), 1.0);
        assert!(rules.era_similarity(ReleaseEra::TwentyTens) > rules.era_similarity(ReleaseEra::Classic));
        assert_eq!(rules.era_similarity(ReleaseEra::Unknown), 0.5);
    }
}
