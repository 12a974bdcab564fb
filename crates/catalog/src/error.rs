//! Error types for the catalog crate.
//!
//! Every gateway operation reports failure through [`CatalogError`]. Callers
//! in the resolver and engine never surface these to end users; they log the
//! error and degrade to "no candidates".

use crate::types::{MediaId, MediaType};
use thiserror::Error;

/// Errors that can occur while loading or querying a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be found or opened
    #[error("Failed to open catalog file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a catalog file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Catalog file is not valid JSON
    #[error("Malformed catalog JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A record couldn't be parsed
    ///
    /// `record` is the zero-based position of the record in the source file
    #[error("Parse error in record {record} of {file}: {reason}")]
    ParseError {
        file: String,
        record: usize,
        reason: String,
    },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Requested item does not exist in the catalog
    #[error("{media_type} {id} not found")]
    NotFound { media_type: MediaType, id: MediaId },

    /// Remote catalog could not be reached or timed out
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
