//! Profile taxonomy.
//!
//! All values here are derived from catalog metadata and never mutated once
//! built. Wire names follow the lowercase / kebab-case vocabulary used by
//! the chat layer (`commercial-mass`, `2010s`, ...).

use catalog::{CandidateItem, ItemDetails};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::culture::CulturalContext;

// ============================================================================
// Categorical dimensions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeScale {
    Epic,
    Large,
    Medium,
    Intimate,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorytellingStyle {
    CommercialMass,
    ActionSpectacle,
    EmotionalDrama,
    ThrillerSuspense,
    Comedy,
    ArtHouse,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudienceType {
    Mass,
    Family,
    Youth,
    Mature,
    Niche,
    Universal,
}

/// Budget/reach tier. Ordered so thresholds can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionScale {
    Unknown,
    Low,
    Mid,
    Big,
    Mega,
}

macro_rules! wire_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_names!(NarrativeScale {
    Epic => "epic",
    Large => "large",
    Medium => "medium",
    Intimate => "intimate",
    Unknown => "unknown",
});

wire_names!(StorytellingStyle {
    CommercialMass => "commercial-mass",
    ActionSpectacle => "action-spectacle",
    EmotionalDrama => "emotional-drama",
    ThrillerSuspense => "thriller-suspense",
    Comedy => "comedy",
    ArtHouse => "art-house",
    Mixed => "mixed",
});

wire_names!(AudienceType {
    Mass => "mass",
    Family => "family",
    Youth => "youth",
    Mature => "mature",
    Niche => "niche",
    Universal => "universal",
});

wire_names!(ProductionScale {
    Unknown => "unknown",
    Low => "low",
    Mid => "mid",
    Big => "big",
    Mega => "mega",
});

impl ProductionScale {
    /// One tier lower, saturating at `Unknown`
    pub fn one_below(self) -> Self {
        match self {
            ProductionScale::Mega => ProductionScale::Big,
            ProductionScale::Big => ProductionScale::Mid,
            ProductionScale::Mid => ProductionScale::Low,
            ProductionScale::Low | ProductionScale::Unknown => ProductionScale::Unknown,
        }
    }
}

/// Release-year bucket. Buckets partition all years with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReleaseEra {
    #[serde(rename = "classic")]
    Classic,
    #[serde(rename = "90s")]
    Nineties,
    #[serde(rename = "2000s")]
    TwoThousands,
    #[serde(rename = "2010s")]
    TwentyTens,
    #[serde(rename = "recent")]
    Recent,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ReleaseEra {
    pub fn from_year(year: Option<u16>) -> Self {
        match year {
            None => ReleaseEra::Unknown,
            Some(..=1989) => ReleaseEra::Classic,
            Some(1990..=1999) => ReleaseEra::Nineties,
            Some(2000..=2009) => ReleaseEra::TwoThousands,
            Some(2010..=2019) => ReleaseEra::TwentyTens,
            Some(2020..) => ReleaseEra::Recent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseEra::Classic => "classic",
            ReleaseEra::Nineties => "90s",
            ReleaseEra::TwoThousands => "2000s",
            ReleaseEra::TwentyTens => "2010s",
            ReleaseEra::Recent => "recent",
            ReleaseEra::Unknown => "unknown",
        }
    }

    /// Position on the timeline, `None` for unknown
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            ReleaseEra::Classic => Some(0),
            ReleaseEra::Nineties => Some(1),
            ReleaseEra::TwoThousands => Some(2),
            ReleaseEra::TwentyTens => Some(3),
            ReleaseEra::Recent => Some(4),
            ReleaseEra::Unknown => None,
        }
    }
}

impl fmt::Display for ReleaseEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThematicTag {
    Epic,
    MassHero,
    Patriotic,
    Revenge,
    Mythology,
    Family,
    Friendship,
    Romance,
    Crime,
    Heist,
    Survival,
    ComingOfAge,
    Politics,
    Justice,
    Supernatural,
}

impl ThematicTag {
    /// Themes that define a commercial-mass or epic reference
    pub const CORE: [ThematicTag; 5] = [
        ThematicTag::Epic,
        ThematicTag::MassHero,
        ThematicTag::Patriotic,
        ThematicTag::Revenge,
        ThematicTag::Mythology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThematicTag::Epic => "epic",
            ThematicTag::MassHero => "mass-hero",
            ThematicTag::Patriotic => "patriotic",
            ThematicTag::Revenge => "revenge",
            ThematicTag::Mythology => "mythology",
            ThematicTag::Family => "family",
            ThematicTag::Friendship => "friendship",
            ThematicTag::Romance => "romance",
            ThematicTag::Crime => "crime",
            ThematicTag::Heist => "heist",
            ThematicTag::Survival => "survival",
            ThematicTag::ComingOfAge => "coming-of-age",
            ThematicTag::Politics => "politics",
            ThematicTag::Justice => "justice",
            ThematicTag::Supernatural => "supernatural",
        }
    }

    pub fn is_core(&self) -> bool {
        Self::CORE.contains(self)
    }
}

impl fmt::Display for ThematicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Structured descriptor of a title's scale, style, audience and themes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CinematicProfile {
    pub narrative_scale: NarrativeScale,
    pub storytelling_style: StorytellingStyle,
    pub audience_type: AudienceType,
    /// 0-100 estimate of how broadly commercial the title is
    pub mass_appeal_score: u8,
    /// Deduplicated, first-seen order
    pub themes: Vec<ThematicTag>,
    pub production_scale: ProductionScale,
    pub release_era: ReleaseEra,
    pub release_year: Option<u16>,

    pub has_epic_scope: bool,
    pub has_mass_hero: bool,
    pub has_patriotic_theme: bool,
    pub has_revenge_theme: bool,
    pub has_mythology: bool,
}

impl CinematicProfile {
    pub fn has_theme(&self, tag: ThematicTag) -> bool {
        self.themes.contains(&tag)
    }
}

/// Metadata the profiler works from
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub title: String,
    pub overview: String,
    pub genre_ids: Vec<catalog::GenreId>,
    pub vote_count: u32,
    pub popularity: f32,
    pub release_year: Option<u16>,
    pub is_regional_cinema: bool,
    pub original_language: String,
}

impl ProfileInput {
    pub fn from_item(item: &CandidateItem, culture: &CulturalContext) -> Self {
        Self {
            title: item.title.clone(),
            overview: item.overview.clone(),
            genre_ids: item.genre_ids.clone(),
            vote_count: item.vote_count,
            popularity: item.popularity,
            release_year: item.release_year,
            is_regional_cinema: culture.is_regional_cinema,
            original_language: culture.language.clone(),
        }
    }

    /// Use the detail lookup's synopsis when it says more than the search result
    pub fn with_details(mut self, details: Option<&ItemDetails>) -> Self {
        if let Some(details) = details
            && details.overview.trim().len() > self.overview.trim().len()
        {
            self.overview = details.overview.clone();
        }
        self
    }
}

/// A candidate together with its derived profile and cultural context
#[derive(Debug, Clone)]
pub struct ProfiledCandidate {
    pub item: CandidateItem,
    pub culture: CulturalContext,
    pub profile: CinematicProfile,
}
