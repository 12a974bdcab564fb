//! Feedback records and the attribute keys weights are learned over.

use crate::error::LearningError;
use catalog::{GenreId, MediaId, MediaType, genres};
use chrono::{DateTime, Utc};
use profiler::{AudienceType, Industry, NarrativeScale, ProfiledCandidate, ReleaseEra, ThematicTag};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Feedback
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackValue {
    Like,
    Dislike,
    Neutral,
}

impl FeedbackValue {
    /// +1 for like, -1 for dislike, 0 for neutral
    pub fn direction(&self) -> f64 {
        match self {
            FeedbackValue::Like => 1.0,
            FeedbackValue::Dislike => -1.0,
            FeedbackValue::Neutral => 0.0,
        }
    }
}

impl FromStr for FeedbackValue {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" | "up" | "+" => Ok(FeedbackValue::Like),
            "dislike" | "down" | "-" => Ok(FeedbackValue::Dislike),
            "neutral" => Ok(FeedbackValue::Neutral),
            other => Err(LearningError::InvalidFeedback(other.to_string())),
        }
    }
}

/// Snapshot of the attributes of a rated title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieAttributes {
    pub genre_ids: Vec<GenreId>,
    pub language: String,
    pub industry: Industry,
    pub era: ReleaseEra,
    #[serde(default)]
    pub themes: Vec<ThematicTag>,
    #[serde(default)]
    pub narrative_scale: Option<NarrativeScale>,
    #[serde(default)]
    pub audience_type: Option<AudienceType>,
}

impl MovieAttributes {
    pub fn from_profiled(candidate: &ProfiledCandidate) -> Self {
        Self {
            genre_ids: candidate.item.genre_ids.clone(),
            language: candidate.culture.language.clone(),
            industry: candidate.culture.industry,
            era: candidate.profile.release_era,
            themes: candidate.profile.themes.clone(),
            narrative_scale: Some(candidate.profile.narrative_scale),
            audience_type: Some(candidate.profile.audience_type),
        }
    }

    /// Every distinct weight key this title touches.
    ///
    /// Empty languages, unknown eras and unknown scales carry no signal and
    /// are skipped.
    pub fn keys(&self) -> Vec<AttributeKey> {
        let mut keys = Vec::new();
        let mut push = |key: AttributeKey| {
            if !keys.contains(&key) {
                keys.push(key);
            }
        };

        for genre in &self.genre_ids {
            push(AttributeKey::Genre(*genre));
        }
        if !self.language.is_empty() {
            push(AttributeKey::Language(self.language.to_lowercase()));
        }
        push(AttributeKey::Industry(self.industry));
        if self.era != ReleaseEra::Unknown {
            push(AttributeKey::Era(self.era));
        }
        for theme in &self.themes {
            push(AttributeKey::Theme(*theme));
        }
        if let Some(scale) = self.narrative_scale
            && scale != NarrativeScale::Unknown
        {
            push(AttributeKey::NarrativeScale(scale));
        }
        if let Some(audience) = self.audience_type {
            push(AttributeKey::Audience(audience));
        }
        keys
    }
}

/// The title being rated
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackTarget {
    pub media_id: MediaId,
    pub media_type: MediaType,
    pub attributes: MovieAttributes,
}

impl FeedbackTarget {
    pub fn from_profiled(candidate: &ProfiledCandidate) -> Self {
        Self {
            media_id: candidate.item.id,
            media_type: candidate.item.media_type,
            attributes: MovieAttributes::from_profiled(candidate),
        }
    }
}

/// One feedback record. At most one exists per `(media_type, media_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFeedback {
    pub id: Uuid,
    pub media_id: MediaId,
    pub media_type: MediaType,
    pub feedback: FeedbackValue,
    pub attributes: MovieAttributes,
    pub reference_media_id: Option<MediaId>,
    pub timestamp: DateTime<Utc>,
}

impl UserFeedback {
    pub fn key(&self) -> (MediaType, MediaId) {
        (self.media_type, self.media_id)
    }
}

// ============================================================================
// Attribute keys
// ============================================================================

/// A learnable attribute, written as `dimension:value` (`genre:28`, `lang:te`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    Genre(GenreId),
    Language(String),
    Industry(Industry),
    Era(ReleaseEra),
    Theme(ThematicTag),
    NarrativeScale(NarrativeScale),
    Audience(AudienceType),
}

impl AttributeKey {
    /// Human-readable label for explanations
    pub fn label(&self) -> String {
        match self {
            AttributeKey::Genre(id) => genres::name(*id).to_string(),
            AttributeKey::Language(code) => format!("{}-language", language_name(code)),
            AttributeKey::Industry(industry) => industry.to_string(),
            AttributeKey::Era(era) => format!("{} releases", era),
            AttributeKey::Theme(theme) => format!("{} stories", theme),
            AttributeKey::NarrativeScale(scale) => format!("{}-scale stories", scale),
            AttributeKey::Audience(audience) => format!("{} entertainers", audience),
        }
    }
}

fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "hi" => "Hindi",
        "te" => "Telugu",
        "ta" => "Tamil",
        "ml" => "Malayalam",
        "kn" => "Kannada",
        "ko" => "Korean",
        "ja" => "Japanese",
        "zh" | "cn" => "Chinese",
        "es" => "Spanish",
        "fr" => "French",
        other => other,
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKey::Genre(id) => write!(f, "genre:{}", id),
            AttributeKey::Language(code) => write!(f, "lang:{}", code),
            AttributeKey::Industry(industry) => write!(f, "industry:{}", industry),
            AttributeKey::Era(era) => write!(f, "era:{}", era),
            AttributeKey::Theme(theme) => write!(f, "theme:{}", theme),
            AttributeKey::NarrativeScale(scale) => write!(f, "scale:{}", scale),
            AttributeKey::Audience(audience) => write!(f, "audience:{}", audience),
        }
    }
}

/// Parse a wire name through the enum's serde representation
fn wire_value<T: DeserializeOwned>(key: &str, value: &str) -> Result<T, LearningError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| LearningError::InvalidAttributeKey(key.to_string()))
}

impl FromStr for AttributeKey {
    type Err = LearningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dimension, value) = s
            .split_once(':')
            .ok_or_else(|| LearningError::InvalidAttributeKey(s.to_string()))?;
        match dimension {
            "genre" => value
                .parse()
                .map(AttributeKey::Genre)
                .map_err(|_| LearningError::InvalidAttributeKey(s.to_string())),
            "lang" if !value.is_empty() => Ok(AttributeKey::Language(value.to_string())),
            "industry" => wire_value(s, value).map(AttributeKey::Industry),
            "era" => wire_value(s, value).map(AttributeKey::Era),
            "theme" => wire_value(s, value).map(AttributeKey::Theme),
            "scale" => wire_value(s, value).map(AttributeKey::NarrativeScale),
            "audience" => wire_value(s, value).map(AttributeKey::Audience),
            _ => Err(LearningError::InvalidAttributeKey(s.to_string())),
        }
    }
}

impl Serialize for AttributeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttributeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
