//! In-memory catalog index.
//!
//! `InMemoryCatalog` holds a catalog dump in memory and serves it through the
//! [`CatalogGateway`] trait. It backs the CLI and the test suites.

use crate::error::{CatalogError, Result};
use crate::gateway::CatalogGateway;
use crate::parser::{self, CatalogEntry};
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Results returned per search page
pub const PAGE_SIZE: usize = 20;

/// Catalog held entirely in memory, keyed by `(MediaType, MediaId)`
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<(MediaType, MediaId), CatalogEntry>,
}

impl InMemoryCatalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Load and validate a catalog dump
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", path);
        let entries = parser::parse_catalog_file(path)?;

        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert_entry(entry);
        }
        catalog.validate()?;

        info!("Loaded {} catalog items", catalog.len());
        Ok(catalog)
    }

    /// Insert an item with details derived from the item itself
    pub fn insert_item(&mut self, item: CandidateItem) {
        let details = ItemDetails {
            production_countries: item.countries.clone(),
            spoken_languages: vec![item.original_language.clone()],
            genres: item
                .genre_ids
                .iter()
                .map(|g| genres::name(*g).to_string())
                .collect(),
            overview: item.overview.clone(),
        };
        self.insert_entry(CatalogEntry { item, details });
    }

    /// Insert an item together with its detail record
    pub fn insert_entry(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.item.key(), entry);
    }

    pub fn get_item(&self, id: MediaId, media_type: MediaType) -> Option<&CandidateItem> {
        self.entries.get(&(media_type, id)).map(|e| &e.item)
    }

    /// All items, most popular first
    pub fn all_items(&self) -> Vec<&CandidateItem> {
        let mut items: Vec<&CandidateItem> = self.entries.values().map(|e| &e.item).collect();
        sort_by_popularity(&mut items);
        items
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that:
    /// - titles are non-empty
    /// - vote averages are within 0-10
    /// - popularity is non-negative
    pub fn validate(&self) -> Result<()> {
        for entry in self.entries.values() {
            let item = &entry.item;
            if item.title.trim().is_empty() {
                return Err(CatalogError::ValidationError(format!(
                    "{} {} has an empty title",
                    item.media_type, item.id
                )));
            }
            if !(0.0..=10.0).contains(&item.vote_average) {
                return Err(CatalogError::InvalidValue {
                    field: "vote_average".to_string(),
                    value: item.vote_average.to_string(),
                });
            }
            if item.popularity < 0.0 || item.popularity.is_nan() {
                return Err(CatalogError::InvalidValue {
                    field: "popularity".to_string(),
                    value: item.popularity.to_string(),
                });
            }
        }
        Ok(())
    }

    /// All items of one type matching the query, most popular first
    fn matching(&self, query: &str, media_type: MediaType) -> Vec<&CandidateItem> {
        let query_tokens = tokens(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }
        let query_joined = query_tokens.join(" ");

        let mut matches: Vec<&CandidateItem> = self
            .entries
            .values()
            .map(|e| &e.item)
            .filter(|item| item.media_type == media_type)
            .filter(|item| {
                let title_tokens = tokens(&item.title);
                if title_tokens.join(" ").contains(&query_joined) {
                    return true;
                }
                // At least half of the query tokens must appear in the title
                let shared = query_tokens
                    .iter()
                    .filter(|t| title_tokens.contains(t))
                    .count();
                shared * 2 >= query_tokens.len() && shared > 0
            })
            .collect();

        sort_by_popularity(&mut matches);
        matches
    }
}

#[async_trait::async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn search_titles(
        &self,
        query: &str,
        media_type: MediaType,
        page: u32,
    ) -> Result<SearchPage> {
        let matches = self.matching(query, media_type);
        let total_pages = matches.len().div_ceil(PAGE_SIZE) as u32;
        let start = (page.max(1) as usize - 1) * PAGE_SIZE;

        let results: Vec<CandidateItem> = matches
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        debug!(
            "search '{}' ({}) page {}: {} results of {} pages",
            query,
            media_type,
            page,
            results.len(),
            total_pages
        );

        Ok(SearchPage {
            results,
            total_pages,
        })
    }

    async fn get_details(&self, id: MediaId, media_type: MediaType) -> Result<ItemDetails> {
        self.entries
            .get(&(media_type, id))
            .map(|e| e.details.clone())
            .ok_or(CatalogError::NotFound { media_type, id })
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

fn sort_by_popularity(items: &mut [&CandidateItem]) {
    items.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
