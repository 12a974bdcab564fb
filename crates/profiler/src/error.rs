//! Error types for the profiler crate.
//!
//! Only reference-data loading can fail. Profiling and rule generation
//! are total functions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Known-titles file could not be found
    #[error("Failed to open known-titles file: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Known-titles file is not a JSON array of profiles
    #[error("Malformed known-titles JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProfilerError>;
