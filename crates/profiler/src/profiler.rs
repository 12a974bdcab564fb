//! Cinematic profile derivation.
//!
//! ## Algorithm
//! 1. Look the title up in the curated [`KnownTitles`] table; a hit returns
//!    the curated profile with defaults for omitted fields
//! 2. Otherwise derive every field from genre ids, vote/popularity
//!    thresholds and keyword hits over title + overview
//!
//! Profiling is pure: identical input always yields an identical profile.

use crate::culture::CulturalContext;
use crate::keywords::{
    EPIC_TERMS, MASS_HERO_TERMS, PATRIOTIC_TERMS, REVENGE_TERMS, count_hits, thematic_tags, words,
};
use crate::known_titles::{KnownProfile, KnownTitles};
use crate::types::{
    AudienceType, CinematicProfile, NarrativeScale, ProductionScale, ProfileInput,
    ProfiledCandidate, ReleaseEra, StorytellingStyle, ThematicTag,
};
use catalog::{CandidateItem, GenreId, genres};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

const EPIC_GENRES: &[GenreId] = &[
    genres::ACTION,
    genres::ADVENTURE,
    genres::FANTASY,
    genres::HISTORY,
    genres::WAR,
    genres::ACTION_ADVENTURE,
    genres::SCI_FI_FANTASY,
    genres::WAR_POLITICS,
];

const LARGE_GENRES: &[GenreId] = &[
    genres::ACTION,
    genres::ADVENTURE,
    genres::SCIENCE_FICTION,
    genres::FANTASY,
    genres::WAR,
    genres::ACTION_ADVENTURE,
    genres::SCI_FI_FANTASY,
    genres::WAR_POLITICS,
];

/// Keyword and genre signals shared by the heuristics
struct Signals {
    epic_hits: usize,
    mass_hero_hits: usize,
    patriotic_hits: usize,
    revenge_hits: usize,
    tags: Vec<ThematicTag>,
    action: bool,
    drama: bool,
}

impl Signals {
    fn collect(input: &ProfileInput) -> Self {
        let text = format!("{} {}", input.title, input.overview);
        let words = words(&text);
        let has = |ids: &[GenreId]| input.genre_ids.iter().any(|g| ids.contains(g));

        Self {
            epic_hits: count_hits(&words, EPIC_TERMS),
            mass_hero_hits: count_hits(&words, MASS_HERO_TERMS),
            patriotic_hits: count_hits(&words, PATRIOTIC_TERMS),
            revenge_hits: count_hits(&words, REVENGE_TERMS),
            tags: thematic_tags(&words),
            action: has(&[genres::ACTION, genres::ACTION_ADVENTURE]),
            drama: has(&[genres::DRAMA]),
        }
    }
}

/// Builds [`CinematicProfile`]s from catalog metadata
#[derive(Debug, Clone)]
pub struct CinematicProfiler {
    known_titles: Arc<KnownTitles>,
}

impl CinematicProfiler {
    pub fn new(known_titles: Arc<KnownTitles>) -> Self {
        Self { known_titles }
    }

    /// Build the profile for one title
    pub fn build_profile(&self, input: &ProfileInput) -> CinematicProfile {
        if let Some(known) = self.known_titles.lookup(&input.title) {
            debug!("Using curated profile '{}' for '{}'", known.title, input.title);
            return from_known(known, input);
        }
        derive_profile(input)
    }

    /// Profile a catalog item with its detected cultural context
    pub fn profile_item(&self, item: &CandidateItem, culture: &CulturalContext) -> CinematicProfile {
        self.build_profile(&ProfileInput::from_item(item, culture))
    }

    /// Profile many candidates in parallel, keeping their order
    pub fn profile_candidates(&self, items: Vec<CandidateItem>) -> Vec<ProfiledCandidate> {
        items
            .into_par_iter()
            .map(|item| {
                let culture = CulturalContext::detect(&item, None);
                let profile = self.profile_item(&item, &culture);
                ProfiledCandidate {
                    item,
                    culture,
                    profile,
                }
            })
            .collect()
    }
}

impl Default for CinematicProfiler {
    fn default() -> Self {
        Self::new(Arc::new(KnownTitles::builtin()))
    }
}

fn from_known(known: &KnownProfile, input: &ProfileInput) -> CinematicProfile {
    let narrative_scale = known.narrative_scale.unwrap_or(KnownProfile::DEFAULT_SCALE);
    let mut themes = Vec::new();
    for tag in &known.themes {
        if !themes.contains(tag) {
            themes.push(*tag);
        }
    }
    assemble(
        narrative_scale,
        known.storytelling_style.unwrap_or(KnownProfile::DEFAULT_STYLE),
        known.audience_type.unwrap_or(KnownProfile::DEFAULT_AUDIENCE),
        known.mass_appeal_score.unwrap_or(KnownProfile::DEFAULT_MASS_APPEAL).min(100),
        themes,
        known.production_scale.unwrap_or(KnownProfile::DEFAULT_PRODUCTION),
        input.release_year,
    )
}

/// Heuristic profile from metadata alone
pub fn derive_profile(input: &ProfileInput) -> CinematicProfile {
    let signals = Signals::collect(input);

    let narrative_scale = narrative_scale(input, &signals);
    let storytelling_style = storytelling_style(input, &signals);
    let audience_type = audience_type(input, &signals);
    let mass_appeal_score = mass_appeal_score(
        narrative_scale,
        storytelling_style,
        audience_type,
        input.vote_count,
        input.popularity,
    );

    let mut themes = Vec::new();
    let mut push = |tag: ThematicTag| {
        if !themes.contains(&tag) {
            themes.push(tag);
        }
    };
    if narrative_scale == NarrativeScale::Epic {
        push(ThematicTag::Epic);
    }
    if signals.mass_hero_hits > 0 {
        push(ThematicTag::MassHero);
    }
    if signals.patriotic_hits > 0 {
        push(ThematicTag::Patriotic);
    }
    if signals.revenge_hits > 0 {
        push(ThematicTag::Revenge);
    }
    for tag in &signals.tags {
        push(*tag);
    }

    assemble(
        narrative_scale,
        storytelling_style,
        audience_type,
        mass_appeal_score,
        themes,
        production_scale(input.vote_count, input.popularity),
        input.release_year,
    )
}

fn assemble(
    narrative_scale: NarrativeScale,
    storytelling_style: StorytellingStyle,
    audience_type: AudienceType,
    mass_appeal_score: u8,
    themes: Vec<ThematicTag>,
    production_scale: ProductionScale,
    release_year: Option<u16>,
) -> CinematicProfile {
    CinematicProfile {
        has_epic_scope: narrative_scale == NarrativeScale::Epic || themes.contains(&ThematicTag::Epic),
        has_mass_hero: themes.contains(&ThematicTag::MassHero),
        has_patriotic_theme: themes.contains(&ThematicTag::Patriotic),
        has_revenge_theme: themes.contains(&ThematicTag::Revenge),
        has_mythology: themes.contains(&ThematicTag::Mythology),
        narrative_scale,
        storytelling_style,
        audience_type,
        mass_appeal_score,
        themes,
        production_scale,
        release_era: ReleaseEra::from_year(release_year),
        release_year,
    }
}

fn has_any(input: &ProfileInput, ids: &[GenreId]) -> bool {
    input.genre_ids.iter().any(|g| ids.contains(g))
}

fn narrative_scale(input: &ProfileInput, signals: &Signals) -> NarrativeScale {
    let votes = input.vote_count;
    if signals.epic_hits >= 2
        || (signals.epic_hits >= 1 && has_any(input, EPIC_GENRES) && votes >= 5_000)
    {
        return NarrativeScale::Epic;
    }
    if input.genre_ids.is_empty() {
        return NarrativeScale::Unknown;
    }
    if has_any(input, LARGE_GENRES) && (votes >= 1_000 || input.popularity >= 20.0) {
        return NarrativeScale::Large;
    }
    if has_any(input, &[genres::DRAMA, genres::ROMANCE]) && !signals.action && votes < 1_000 {
        return NarrativeScale::Intimate;
    }
    NarrativeScale::Medium
}

fn storytelling_style(input: &ProfileInput, signals: &Signals) -> StorytellingStyle {
    if signals.drama && !signals.action && input.popularity < 10.0 && input.vote_count < 300 {
        StorytellingStyle::ArtHouse
    } else if signals.action && (input.is_regional_cinema || signals.mass_hero_hits > 0) {
        StorytellingStyle::CommercialMass
    } else if signals.action || has_any(input, &[genres::SCIENCE_FICTION, genres::WAR]) {
        StorytellingStyle::ActionSpectacle
    } else if has_any(input, &[genres::THRILLER, genres::CRIME, genres::MYSTERY, genres::HORROR]) {
        StorytellingStyle::ThrillerSuspense
    } else if has_any(input, &[genres::COMEDY]) {
        StorytellingStyle::Comedy
    } else if has_any(input, &[genres::DRAMA, genres::ROMANCE, genres::FAMILY]) {
        StorytellingStyle::EmotionalDrama
    } else {
        StorytellingStyle::Mixed
    }
}

fn audience_type(input: &ProfileInput, signals: &Signals) -> AudienceType {
    if has_any(input, &[genres::FAMILY, genres::ANIMATION, genres::KIDS]) {
        AudienceType::Family
    } else if (input.is_regional_cinema && (signals.action || signals.mass_hero_hits > 0))
        || (signals.action && input.vote_count >= 10_000)
    {
        AudienceType::Mass
    } else if input.vote_count < 200 && input.popularity < 5.0 {
        AudienceType::Niche
    } else if has_any(input, &[genres::HORROR, genres::CRIME, genres::WAR, genres::THRILLER]) {
        AudienceType::Mature
    } else if has_any(input, &[genres::COMEDY, genres::ROMANCE]) {
        AudienceType::Youth
    } else {
        AudienceType::Universal
    }
}

/// 0-100 mass-appeal estimate from categorical bonuses and reach tiers
pub fn mass_appeal_score(
    scale: NarrativeScale,
    style: StorytellingStyle,
    audience: AudienceType,
    vote_count: u32,
    popularity: f32,
) -> u8 {
    let scale_points = match scale {
        NarrativeScale::Epic => 30,
        NarrativeScale::Large => 22,
        NarrativeScale::Medium => 12,
        NarrativeScale::Intimate => 5,
        NarrativeScale::Unknown => 8,
    };
    let style_points = match style {
        StorytellingStyle::CommercialMass => 25,
        StorytellingStyle::ActionSpectacle => 20,
        StorytellingStyle::EmotionalDrama => 12,
        StorytellingStyle::ThrillerSuspense => 10,
        StorytellingStyle::Comedy => 8,
        StorytellingStyle::Mixed => 8,
        StorytellingStyle::ArtHouse => 0,
    };
    let audience_points = match audience {
        AudienceType::Mass => 20,
        AudienceType::Universal => 15,
        AudienceType::Family => 12,
        AudienceType::Youth => 10,
        AudienceType::Mature => 6,
        AudienceType::Niche => 0,
    };
    let vote_points = match vote_count {
        20_000.. => 15,
        5_000..=19_999 => 10,
        1_000..=4_999 => 6,
        100..=999 => 3,
        _ => 0,
    };
    let popularity_points = if popularity >= 100.0 {
        10
    } else if popularity >= 40.0 {
        6
    } else if popularity >= 10.0 {
        3
    } else {
        0
    };

    let total: u32 = scale_points + style_points + audience_points + vote_points + popularity_points;
    total.min(100) as u8
}

pub fn production_scale(vote_count: u32, popularity: f32) -> ProductionScale {
    if vote_count >= 20_000 || popularity >= 150.0 {
        ProductionScale::Mega
    } else if vote_count >= 5_000 || popularity >= 50.0 {
        ProductionScale::Big
    } else if vote_count >= 500 || popularity >= 10.0 {
        ProductionScale::Mid
    } else if vote_count > 0 || popularity > 0.0 {
        ProductionScale::Low
    } else {
        ProductionScale::Unknown
    }
}
