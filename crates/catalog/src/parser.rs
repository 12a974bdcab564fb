//! Parser for catalog dump files.
//!
//! A catalog file is a JSON array of records shaped like the search results
//! of a TMDB-style API. Movies carry `title`/`release_date`, series carry
//! `name`/`first_air_date`; both are accepted:
//!
//! ```json
//! [{ "id": 256040, "title": "Baahubali: The Beginning", "media_type": "movie",
//!    "original_language": "te", "origin_country": ["IN"], "genre_ids": [28, 12],
//!    "release_date": "2015-07-10", "vote_count": 20000, "popularity": 60.2,
//!    "vote_average": 7.5, "overview": "..." }]
//! ```

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A record exactly as it appears in the dump
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: MediaId,
    title: Option<String>,
    name: Option<String>,
    media_type: String,
    #[serde(default)]
    original_language: String,
    #[serde(default)]
    origin_country: Vec<String>,
    #[serde(default)]
    production_countries: Vec<String>,
    #[serde(default)]
    spoken_languages: Vec<String>,
    #[serde(default)]
    genre_ids: Vec<GenreId>,
    #[serde(default)]
    genres: Vec<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_count: u32,
    #[serde(default)]
    popularity: f32,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    overview: String,
}

/// A parsed record: the search-result view plus its detail view
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub item: CandidateItem,
    pub details: ItemDetails,
}

/// Parse a catalog dump file
pub fn parse_catalog_file(path: &Path) -> Result<Vec<CatalogEntry>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    parse_catalog_str(&content, &file)
}

/// Parse catalog records from an in-memory JSON string
pub fn parse_catalog_str(content: &str, file: &str) -> Result<Vec<CatalogEntry>> {
    let records: Vec<RawRecord> = serde_json::from_str(content)?;
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| parse_record(record, file, idx))
        .collect()
}

fn parse_record(record: RawRecord, file: &str, idx: usize) -> Result<CatalogEntry> {
    let title = record
        .title
        .or(record.name)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CatalogError::ParseError {
            file: file.to_string(),
            record: idx,
            reason: "Missing title".to_string(),
        })?;

    let media_type = parse_media_type(&record.media_type)?;

    let date = record.release_date.or(record.first_air_date);
    let release_year = match date.as_deref() {
        Some(d) if !d.trim().is_empty() => {
            Some(parse_release_year(d).ok_or_else(|| CatalogError::ParseError {
                file: file.to_string(),
                record: idx,
                reason: format!("Invalid release date: {}", d),
            })?)
        }
        _ => None,
    };

    // Production countries are the better signal; fall back to origin
    let countries: Vec<String> = if record.production_countries.is_empty() {
        record.origin_country.clone()
    } else {
        record.production_countries.clone()
    }
    .into_iter()
    .map(|c| c.trim().to_uppercase())
    .collect();

    let original_language = record.original_language.trim().to_lowercase();

    let item = CandidateItem {
        id: record.id,
        title,
        media_type,
        original_language: original_language.clone(),
        countries: countries.clone(),
        genre_ids: record.genre_ids,
        release_year,
        vote_count: record.vote_count,
        popularity: record.popularity,
        vote_average: record.vote_average,
        overview: record.overview.clone(),
    };

    let spoken_languages = if record.spoken_languages.is_empty() {
        vec![original_language]
    } else {
        record
            .spoken_languages
            .into_iter()
            .map(|l| l.trim().to_lowercase())
            .collect()
    };

    let details = ItemDetails {
        production_countries: countries,
        spoken_languages,
        genres: record.genres,
        overview: record.overview,
    };

    Ok(CatalogEntry { item, details })
}

/// Parse a media type string
///
/// Example: "movie" -> Ok(MediaType::Movie)
///          "tv" -> Ok(MediaType::Series)
fn parse_media_type(s: &str) -> Result<MediaType> {
    match s.trim().to_lowercase().as_str() {
        "movie" | "film" => Ok(MediaType::Movie),
        "tv" | "series" | "show" => Ok(MediaType::Series),
        _ => Err(CatalogError::InvalidValue {
            field: "media_type".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Extract the year from an ISO date
///
/// Example: "2015-07-10" -> Some(2015)
///          "2015" -> Some(2015)
///          "soon" -> None
pub fn parse_release_year(date: &str) -> Option<u16> {
    let year = date.trim().split('-').next()?;
    if year.len() != 4 {
        return None;
    }
    year.parse::<u16>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("2015-07-10"), Some(2015));
        assert_eq!(parse_release_year("1975"), Some(1975));
        assert_eq!(parse_release_year("soon"), None);
        assert_eq!(parse_release_year("15-07-10"), None);
    }

    #[test]
    fn test_parse_media_type() {
        assert_eq!(parse_media_type("movie").unwrap(), MediaType::Movie);
        assert_eq!(parse_media_type("TV").unwrap(), MediaType::Series);
        assert!(parse_media_type("podcast").is_err());
    }

    #[test]
    fn test_parse_movie_and_series_records() {
        let json = r#"[
            {"id": 1, "title": "RRR", "media_type": "movie", "original_language": "TE",
             "origin_country": ["in"], "genre_ids": [28, 18], "release_date": "2022-03-24",
             "vote_count": 1500, "popularity": 45.0, "vote_average": 7.8},
            {"id": 2, "name": "Squid Game", "media_type": "tv", "original_language": "ko",
             "origin_country": ["KR"], "first_air_date": "2021-09-17"}
        ]"#;

        let entries = parse_catalog_str(json, "test.json").unwrap();
        assert_eq!(entries.len(), 2);

        let rrr = &entries[0].item;
        assert_eq!(rrr.title, "RRR");
        assert_eq!(rrr.original_language, "te");
        assert_eq!(rrr.countries, vec!["IN".to_string()]);
        assert_eq!(rrr.release_year, Some(2022));
        assert_eq!(entries[0].details.spoken_languages, vec!["te".to_string()]);

        let squid = &entries[1].item;
        assert_eq!(squid.title, "Squid Game");
        assert_eq!(squid.media_type, MediaType::Series);
        assert_eq!(squid.release_year, Some(2021));
    }

    #[test]
    fn test_missing_title_reports_record() {
        let json = r#"[{"id": 7, "media_type": "movie"}]"#;
        match parse_catalog_str(json, "broken.json") {
            Err(CatalogError::ParseError { record, .. }) => assert_eq!(record, 0),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
