//! Curated profiles for high-profile titles.
//!
//! Heuristics misjudge a handful of very well known films (a Telugu epic
//! and a small drama can share genre ids), so those get hand-authored
//! profiles. The table is immutable once built and shared through `Arc`.

use crate::error::{ProfilerError, Result};
use crate::types::{AudienceType, NarrativeScale, ProductionScale, StorytellingStyle, ThematicTag};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A curated profile. Omitted fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownProfile {
    pub title: String,
    #[serde(default)]
    pub narrative_scale: Option<NarrativeScale>,
    #[serde(default)]
    pub storytelling_style: Option<StorytellingStyle>,
    #[serde(default)]
    pub audience_type: Option<AudienceType>,
    #[serde(default)]
    pub mass_appeal_score: Option<u8>,
    #[serde(default)]
    pub themes: Vec<ThematicTag>,
    #[serde(default)]
    pub production_scale: Option<ProductionScale>,
}

impl KnownProfile {
    pub const DEFAULT_SCALE: NarrativeScale = NarrativeScale::Large;
    pub const DEFAULT_STYLE: StorytellingStyle = StorytellingStyle::CommercialMass;
    pub const DEFAULT_AUDIENCE: AudienceType = AudienceType::Mass;
    pub const DEFAULT_MASS_APPEAL: u8 = 80;
    pub const DEFAULT_PRODUCTION: ProductionScale = ProductionScale::Big;
}

/// Lookup from title to curated profile
#[derive(Debug, Clone, Default)]
pub struct KnownTitles {
    entries: Vec<(String, KnownProfile)>,
}

impl KnownTitles {
    pub fn new(profiles: Vec<KnownProfile>) -> Self {
        let mut entries: Vec<(String, KnownProfile)> = profiles
            .into_iter()
            .map(|p| (match_key(&p.title), p))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        // Longer keys first so "baahubali 2" beats "baahubali"
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    /// An empty table: every title is profiled heuristically
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a JSON array of [`KnownProfile`]s
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProfilerError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let profiles: Vec<KnownProfile> = serde_json::from_str(&contents)?;
        info!("Loaded {} known-title profiles from {}", profiles.len(), path.display());
        Ok(Self::new(profiles))
    }

    /// Find the curated profile for `title`.
    ///
    /// An exact key match wins. Otherwise the longest key contained in the
    /// title wins, matched on whole words so "Leo" stays out of "Napoleon".
    /// Sequels and spin-offs ("Vikram Vedha") therefore share the profile of
    /// the title they contain.
    pub fn lookup(&self, title: &str) -> Option<&KnownProfile> {
        let key = match_key(title);
        if let Some((_, profile)) = self.entries.iter().find(|(k, _)| *k == key) {
            return Some(profile);
        }
        let padded = format!(" {} ", key);
        self.entries
            .iter()
            .find(|(k, _)| padded.contains(&format!(" {} ", k)))
            .map(|(_, profile)| profile)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in table of high-profile titles
    pub fn builtin() -> Self {
        use AudienceType as A;
        use NarrativeScale as N;
        use ProductionScale as P;
        use StorytellingStyle as S;
        use ThematicTag as T;

        let known = |title: &str,
                     scale: Option<NarrativeScale>,
                     style: Option<StorytellingStyle>,
                     audience: Option<AudienceType>,
                     appeal: Option<u8>,
                     themes: &[ThematicTag],
                     production: Option<ProductionScale>| KnownProfile {
            title: title.to_string(),
            narrative_scale: scale,
            storytelling_style: style,
            audience_type: audience,
            mass_appeal_score: appeal,
            themes: themes.to_vec(),
            production_scale: production,
        };

        Self::new(vec![
            // Telugu
            known("Baahubali", Some(N::Epic), None, None, Some(95), &[T::Epic, T::MassHero, T::Mythology, T::Revenge], Some(P::Mega)),
            known("RRR", Some(N::Epic), None, None, Some(95), &[T::Epic, T::MassHero, T::Patriotic, T::Friendship], Some(P::Mega)),
            known("Pushpa", None, None, None, Some(90), &[T::MassHero, T::Crime], None),
            known("Magadheera", Some(N::Epic), None, None, Some(88), &[T::Epic, T::Romance, T::Revenge], None),
            known("Eega", Some(N::Medium), Some(S::ActionSpectacle), Some(A::Universal), Some(75), &[T::Revenge, T::Romance], Some(P::Mid)),
            known("Arjun Reddy", Some(N::Intimate), Some(S::EmotionalDrama), Some(A::Youth), Some(70), &[T::Romance], Some(P::Mid)),
            known("Salaar", Some(N::Epic), None, None, Some(88), &[T::MassHero, T::Friendship, T::Revenge], Some(P::Mega)),
            // Kannada
            known("K.G.F", Some(N::Epic), None, None, Some(92), &[T::MassHero, T::Crime, T::Revenge], Some(P::Mega)),
            known("Kantara", Some(N::Large), None, None, Some(85), &[T::Mythology, T::Supernatural, T::Justice], None),
            // Tamil
            known("Vikram", None, None, None, Some(88), &[T::MassHero, T::Crime, T::Revenge], None),
            known("Jailer", None, None, None, Some(85), &[T::MassHero, T::Family, T::Crime], None),
            known("Leo", None, None, None, Some(84), &[T::MassHero, T::Family], None),
            known("Kaithi", Some(N::Medium), Some(S::ActionSpectacle), None, Some(78), &[T::MassHero, T::Survival], Some(P::Mid)),
            // Malayalam
            known("Drishyam", Some(N::Intimate), Some(S::ThrillerSuspense), Some(A::Family), Some(72), &[T::Family, T::Crime], Some(P::Mid)),
            // Hindi
            known("Pathaan", None, Some(S::ActionSpectacle), None, Some(88), &[T::Patriotic, T::MassHero], Some(P::Mega)),
            known("Jawan", None, None, None, Some(88), &[T::MassHero, T::Justice, T::Revenge], Some(P::Mega)),
            known("Animal", None, None, Some(A::Mature), Some(82), &[T::Family, T::Revenge], None),
            known("Dangal", Some(N::Medium), Some(S::EmotionalDrama), Some(A::Family), Some(85), &[T::Family, T::Patriotic], None),
            known("3 Idiots", Some(N::Medium), Some(S::Comedy), Some(A::Youth), Some(88), &[T::Friendship, T::ComingOfAge], None),
            known("Lagaan", Some(N::Epic), Some(S::EmotionalDrama), Some(A::Universal), Some(85), &[T::Patriotic], None),
            known("Sholay", Some(N::Large), None, None, Some(90), &[T::Friendship, T::Revenge], None),
            // Korean / Japanese / Chinese
            known("Parasite", Some(N::Intimate), Some(S::ThrillerSuspense), Some(A::Mature), Some(70), &[T::Family, T::Crime], Some(P::Mid)),
            known("Train to Busan", Some(N::Medium), Some(S::ActionSpectacle), Some(A::Universal), Some(75), &[T::Survival, T::Family], Some(P::Mid)),
            known("Oldboy", Some(N::Intimate), Some(S::ThrillerSuspense), Some(A::Mature), Some(55), &[T::Revenge], Some(P::Low)),
            known("Spirited Away", Some(N::Large), Some(S::Mixed), Some(A::Family), Some(80), &[T::Supernatural, T::ComingOfAge], None),
            known("Crouching Tiger, Hidden Dragon", Some(N::Epic), Some(S::ActionSpectacle), Some(A::Universal), Some(75), &[T::Epic, T::Romance], None),
            // English
            known("The Dark Knight", Some(N::Large), Some(S::ActionSpectacle), Some(A::Universal), Some(92), &[T::Justice, T::Crime], Some(P::Mega)),
            known("Avengers: Endgame", Some(N::Epic), Some(S::ActionSpectacle), Some(A::Universal), Some(98), &[T::Epic, T::Friendship], Some(P::Mega)),
            known("Gladiator", Some(N::Epic), Some(S::ActionSpectacle), None, Some(88), &[T::Epic, T::Revenge], Some(P::Mega)),
            known("Interstellar", Some(N::Epic), Some(S::Mixed), Some(A::Universal), Some(86), &[T::Family, T::Survival], Some(P::Mega)),
        ])
    }
}

/// Lower-cased alphanumeric words joined by single spaces
fn match_key(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_by_word_substring() {
        let table = KnownTitles::builtin();
        assert!(table.len() >= 30);

        let profile = table.lookup("Baahubali: The Beginning").unwrap();
        assert_eq!(profile.mass_appeal_score, Some(95));

        assert!(table.lookup("K.G.F: Chapter 2").is_some());
        // "Leo" must not match inside "Napoleon"
        assert!(table.lookup("Napoleon").is_none());
    }

    #[test]
    fn test_longest_key_wins() {
        let table = KnownTitles::new(vec![
            KnownProfile {
                title: "Drishyam".to_string(),
                narrative_scale: None,
                storytelling_style: None,
                audience_type: None,
                mass_appeal_score: Some(70),
                themes: vec![],
                production_scale: None,
            },
            KnownProfile {
                title: "Drishyam 2".to_string(),
                narrative_scale: None,
                storytelling_style: None,
                audience_type: None,
                mass_appeal_score: Some(75),
                themes: vec![],
                production_scale: None,
            },
        ]);
        assert_eq!(table.lookup("Drishyam 2").unwrap().mass_appeal_score, Some(75));
        assert_eq!(table.lookup("Drishyam").unwrap().mass_appeal_score, Some(70));
    }

    #[test]
    fn test_exact_title_beats_contained_title() {
        let profile = |title: &str, appeal: u8| KnownProfile {
            title: title.to_string(),
            narrative_scale: None,
            storytelling_style: None,
            audience_type: None,
            mass_appeal_score: Some(appeal),
            themes: vec![],
            production_scale: None,
        };
        let table = KnownTitles::new(vec![profile("Vikram", 88), profile("Vikram Vedha Returns", 60)]);

        assert_eq!(table.lookup("vikram").unwrap().mass_appeal_score, Some(88));
        assert_eq!(table.lookup("Vikram Vedha Returns").unwrap().mass_appeal_score, Some(60));
        // No entry of its own: falls back to the contained title
        assert_eq!(table.lookup("Vikram Vedha").unwrap().mass_appeal_score, Some(88));
    }

    #[test]
    fn test_partial_json_profile() {
        let json = r#"[{"title": "Kaantha", "mass_appeal_score": 60}]"#;
        let profiles: Vec<KnownProfile> = serde_json::from_str(json).unwrap();
        assert_eq!(profiles[0].narrative_scale, None);
        assert!(profiles[0].themes.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = KnownTitles::load_from_file(Path::new("/nonexistent/known.json"));
        assert!(matches!(result, Err(ProfilerError::FileNotFound { .. })));
    }
}
