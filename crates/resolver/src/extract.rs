//! Reference extraction from free text.
//!
//! Pulls the anchor title (and an optional release year) out of messages
//! such as "movies like Baahubali (2015)" or "anything similar to Drishyam".

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Earliest year accepted as a release year
pub const MIN_YEAR: i32 = 1900;

/// Phrase patterns in priority order. The first match wins.
static REFERENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:movies?|films?|shows?|series|something|anything|stuff|titles?)\s+(?:just\s+)?like\s+(.+)",
        r"(?i)\bsimilar\s+to\s+(.+)",
        r"(?i)\bfans?\s+of\s+(.+)",
        r"(?i)\bif\s+i\s+(?:liked|loved|enjoyed)\s+(.+)",
        r"(?i)\b(?:in\s+the\s+)?(?:style|vein|spirit)\s+of\s+(.+)",
        r"(?i)\bbased\s+on\s+(.+)",
        r"(?i)^\s*like\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("reference pattern should compile"))
    .collect()
});

// Embedded year formats, tried in this order
static YEAR_PARENS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d{4})\)").expect("parenthesized year regex should compile"));
static YEAR_BRACKET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d{4})\]").expect("bracketed year regex should compile"));
static YEAR_COMMA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*(\d{4})\s*$").expect("comma year regex should compile"));
static YEAR_TRAILING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s(\d{4})\s*$").expect("trailing year regex should compile"));

const TRAILING_FILLERS: &[&str] = &["please", "pls", "plz", "thanks", "thank you"];

/// A title reference found in a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReference {
    pub title: String,
    pub year: Option<u16>,
    pub has_year: bool,
}

impl ExtractedReference {
    pub fn new(title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            year,
            has_year: year.is_some(),
        }
    }
}

/// Extracts references, accepting years up to `current_year + 2`
#[derive(Debug, Clone, Copy)]
pub struct ReferenceExtractor {
    current_year: i32,
}

impl ReferenceExtractor {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Find the referenced title in a message.
    ///
    /// Returns `None` when no pattern matches or the captured title is empty.
    pub fn extract(&self, text: &str) -> Option<ExtractedReference> {
        let captured = REFERENCE_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())?;

        let cleaned = clean_title(captured);
        let (title, year) = self.split_year(&cleaned);
        if title.is_empty() {
            return None;
        }

        debug!("Extracted reference '{}' (year: {:?})", title, year);
        Some(ExtractedReference::new(title, year))
    }

    /// Strip an embedded year from a title.
    ///
    /// Years outside `[1900, current_year + 2]` are left in the title,
    /// so "Blade Runner 2049" keeps its number.
    pub fn split_year(&self, title: &str) -> (String, Option<u16>) {
        let patterns: [&Regex; 4] = [
            &YEAR_PARENS_PATTERN,
            &YEAR_BRACKET_PATTERN,
            &YEAR_COMMA_PATTERN,
            &YEAR_TRAILING_PATTERN,
        ];

        for pattern in patterns {
            let Some(caps) = pattern.captures(title) else {
                continue;
            };
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(year) = digits.as_str().parse::<i32>() else {
                continue;
            };
            if !self.is_valid_year(year) {
                continue;
            }

            let mut stripped = String::with_capacity(title.len());
            stripped.push_str(&title[..whole.start()]);
            stripped.push(' ');
            stripped.push_str(&title[whole.end()..]);
            let stripped = tidy(&stripped);
            if stripped.is_empty() {
                // A bare year is a title ("1917"), not a year
                continue;
            }
            return (stripped, Some(year as u16));
        }

        (tidy(title), None)
    }

    pub fn is_valid_year(&self, year: i32) -> bool {
        (MIN_YEAR..=self.current_year + 2).contains(&year)
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new(chrono::Utc::now().year())
    }
}

/// Extract a reference using the current calendar year
pub fn resolve_reference(text: &str) -> Option<ExtractedReference> {
    ReferenceExtractor::default().extract(text)
}

/// Trim punctuation, quotes and polite fillers around a captured title
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();

    loop {
        let before = title.len();
        title = title
            .trim_end_matches(|c: char| matches!(c, '?' | '!' | '.' | ';' | ' '))
            .to_string();

        let lower = title.to_lowercase();
        // Byte offsets are only shared when lower-casing kept the length
        let fillers: &[&str] = if lower.len() == title.len() { TRAILING_FILLERS } else { &[] };
        for filler in fillers {
            if let Some(prefix) = lower.strip_suffix(filler)
                && (prefix.is_empty() || prefix.ends_with([' ', ',']))
            {
                title.truncate(prefix.len());
                title = title.trim_end_matches([' ', ',']).to_string();
                break;
            }
        }

        if title.len() == before {
            break;
        }
    }

    title
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’' | '`'))
        .trim()
        .to_string()
}

/// Collapse whitespace and drop dangling separators
fn tidy(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ',' | '-' | ':' | ' '))
        .to_string()
}
