//! # Catalog Crate
//!
//! Catalog records and the gateway through which the recommendation core
//! reads them.
//!
//! ## Main Components
//!
//! - **types**: Catalog records (`CandidateItem`, `ItemDetails`, `SearchPage`)
//! - **gateway**: The async `CatalogGateway` trait
//! - **parser**: Parse catalog dump files into records
//! - **index**: `InMemoryCatalog`, a gateway over a loaded dump
//! - **error**: Error types for catalog access
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogGateway, InMemoryCatalog, MediaType};
//! use std::path::Path;
//!
//! let catalog = InMemoryCatalog::load_from_file(Path::new("data/catalog.json"))?;
//! let page = catalog.search_titles("baahubali", MediaType::Movie, 1).await?;
//! println!("{} results", page.results.len());
//! ```

pub mod error;
pub mod gateway;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use gateway::CatalogGateway;
pub use index::InMemoryCatalog;
pub use types::{
    // Type aliases
    GenreId,
    MediaId,
    // Records
    CandidateItem,
    ItemDetails,
    MediaType,
    SearchPage,
    // Genre ids
    genres,
};
