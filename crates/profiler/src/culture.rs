//! Cultural context detection.
//!
//! Classifies a title by language and production country into an industry
//! and the flags that drive the language policy of the filter rules.

use catalog::{CandidateItem, ItemDetails};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Indian-language cinema codes
const INDIAN_LANGUAGES: &[&str] = &["hi", "te", "ta", "ml", "kn", "bn", "mr", "pa", "gu", "or"];

const EUROPEAN_LANGUAGES: &[&str] = &[
    "fr", "de", "es", "it", "pt", "nl", "sv", "da", "no", "fi", "pl", "ru",
];

/// Countries whose English-language output counts as mainstream
const MAINSTREAM_ENGLISH_COUNTRIES: &[&str] = &["US", "GB", "CA", "AU"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    Tollywood,
    Bollywood,
    Kollywood,
    Mollywood,
    Sandalwood,
    OtherIndian,
    Korean,
    Japanese,
    Chinese,
    Hollywood,
    British,
    European,
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Tollywood => "tollywood",
            Industry::Bollywood => "bollywood",
            Industry::Kollywood => "kollywood",
            Industry::Mollywood => "mollywood",
            Industry::Sandalwood => "sandalwood",
            Industry::OtherIndian => "other-indian",
            Industry::Korean => "korean",
            Industry::Japanese => "japanese",
            Industry::Chinese => "chinese",
            Industry::Hollywood => "hollywood",
            Industry::British => "british",
            Industry::European => "european",
            Industry::Other => "other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language and country signals for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalContext {
    /// Lower-cased ISO 639-1 code
    pub language: String,
    /// Upper-cased ISO 3166-1 codes, first-seen order
    pub countries: Vec<String>,
    pub is_regional_cinema: bool,
    pub is_korean: bool,
    pub is_japanese: bool,
    pub is_chinese: bool,
    pub is_mainstream_english: bool,
    pub industry: Industry,
}

impl CulturalContext {
    /// Detect the context from a search record, enriched by details when available
    pub fn detect(item: &CandidateItem, details: Option<&ItemDetails>) -> Self {
        let language = item.original_language.trim().to_lowercase();

        let mut countries: Vec<String> = Vec::new();
        let detail_countries = details
            .map(|d| d.production_countries.as_slice())
            .unwrap_or_default();
        for country in item.countries.iter().chain(detail_countries) {
            let country = country.trim().to_uppercase();
            if !country.is_empty() && !countries.contains(&country) {
                countries.push(country);
            }
        }

        let has_country = |code: &str| countries.iter().any(|c| c == code);
        let is_indian_language = INDIAN_LANGUAGES.contains(&language.as_str());

        let is_regional_cinema = is_indian_language || (has_country("IN") && language != "en");
        let is_korean = language == "ko";
        let is_japanese = language == "ja";
        let is_chinese = matches!(language.as_str(), "zh" | "cn");
        let is_mainstream_english = language == "en"
            && (countries.is_empty()
                || MAINSTREAM_ENGLISH_COUNTRIES.iter().any(|c| has_country(c)));

        let industry = match language.as_str() {
            "te" => Industry::Tollywood,
            "hi" => Industry::Bollywood,
            "ta" => Industry::Kollywood,
            "ml" => Industry::Mollywood,
            "kn" => Industry::Sandalwood,
            _ if is_indian_language || is_regional_cinema => Industry::OtherIndian,
            "ko" => Industry::Korean,
            "ja" => Industry::Japanese,
            "zh" | "cn" => Industry::Chinese,
            "en" if has_country("GB") && !has_country("US") => Industry::British,
            "en" if is_mainstream_english => Industry::Hollywood,
            lang if EUROPEAN_LANGUAGES.contains(&lang) => Industry::European,
            _ => Industry::Other,
        };

        Self {
            language,
            countries,
            is_regional_cinema,
            is_korean,
            is_japanese,
            is_chinese,
            is_mainstream_english,
            industry,
        }
    }

    /// Korean, Japanese or Chinese cinema
    pub fn is_east_asian(&self) -> bool {
        self.is_korean || self.is_japanese || self.is_chinese
    }
}
