//! Core catalog records.
//!
//! These are the raw records handed over by a catalog gateway. Everything
//! downstream (resolution, profiling, learning) only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Catalog-wide identifier of a movie or series
pub type MediaId = u64;

/// Numeric genre identifier (TMDB numbering)
pub type GenreId = u32;

// =============================================================================
// Media Type
// =============================================================================

/// Whether a record is a feature film or an episodic series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    #[serde(alias = "tv")]
    Series,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Genres
// =============================================================================

/// Well-known genre ids.
///
/// Movie and series catalogs share most ids; the series-only ids are the
/// combined "Action & Adventure" style buckets.
pub mod genres {
    use super::GenreId;

    pub const ACTION: GenreId = 28;
    pub const ADVENTURE: GenreId = 12;
    pub const ANIMATION: GenreId = 16;
    pub const COMEDY: GenreId = 35;
    pub const CRIME: GenreId = 80;
    pub const DOCUMENTARY: GenreId = 99;
    pub const DRAMA: GenreId = 18;
    pub const FAMILY: GenreId = 10751;
    pub const FANTASY: GenreId = 14;
    pub const HISTORY: GenreId = 36;
    pub const HORROR: GenreId = 27;
    pub const MUSIC: GenreId = 10402;
    pub const MYSTERY: GenreId = 9648;
    pub const ROMANCE: GenreId = 10749;
    pub const SCIENCE_FICTION: GenreId = 878;
    pub const THRILLER: GenreId = 53;
    pub const WAR: GenreId = 10752;
    pub const WESTERN: GenreId = 37;

    // Series-only buckets
    pub const ACTION_ADVENTURE: GenreId = 10759;
    pub const KIDS: GenreId = 10762;
    pub const SCI_FI_FANTASY: GenreId = 10765;
    pub const WAR_POLITICS: GenreId = 10768;

    /// Human readable genre name, used in explanations
    pub fn name(id: GenreId) -> &'static str {
        match id {
            ACTION => "Action",
            ADVENTURE => "Adventure",
            ANIMATION => "Animation",
            COMEDY => "Comedy",
            CRIME => "Crime",
            DOCUMENTARY => "Documentary",
            DRAMA => "Drama",
            FAMILY => "Family",
            FANTASY => "Fantasy",
            HISTORY => "History",
            HORROR => "Horror",
            MUSIC => "Music",
            MYSTERY => "Mystery",
            ROMANCE => "Romance",
            SCIENCE_FICTION => "Science Fiction",
            THRILLER => "Thriller",
            WAR => "War",
            WESTERN => "Western",
            ACTION_ADVENTURE => "Action & Adventure",
            KIDS => "Kids",
            SCI_FI_FANTASY => "Sci-Fi & Fantasy",
            WAR_POLITICS => "War & Politics",
            _ => "Other",
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// A raw search result from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: MediaId,
    pub title: String,
    pub media_type: MediaType,
    /// ISO 639-1 code, lower-cased
    pub original_language: String,
    /// ISO 3166-1 alpha-2 codes, upper-cased
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    pub release_year: Option<u16>,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f32,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub overview: String,
}

impl CandidateItem {
    /// Key identifying this record across movie and series namespaces
    pub fn key(&self) -> (MediaType, MediaId) {
        (self.media_type, self.id)
    }

    /// "Title (Year)" or just "Title" when the year is unknown
    pub fn display_title(&self) -> String {
        match self.release_year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }

    pub fn has_genre(&self, genre: GenreId) -> bool {
        self.genre_ids.contains(&genre)
    }
}

/// Detail record fetched for a single item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    #[serde(default)]
    pub production_countries: Vec<String>,
    #[serde(default)]
    pub spoken_languages: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub overview: String,
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<CandidateItem>,
    pub total_pages: u32,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_wire_names() {
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaType::Series).unwrap(), "\"series\"");

        let tv: MediaType = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(tv, MediaType::Series);
    }

    #[test]
    fn test_display_title() {
        let mut item = CandidateItem {
            id: 1,
            title: "Eega".to_string(),
            media_type: MediaType::Movie,
            original_language: "te".to_string(),
            countries: vec!["IN".to_string()],
            genre_ids: vec![genres::FANTASY],
            release_year: Some(2012),
            vote_count: 300,
            popularity: 8.0,
            vote_average: 7.1,
            overview: String::new(),
        };
        assert_eq!(item.display_title(), "Eega (2012)");

        item.release_year = None;
        assert_eq!(item.display_title(), "Eega");
        assert!(item.has_genre(genres::FANTASY));
    }
}
