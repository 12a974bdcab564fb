//! Error types for the learning crate.
//!
//! Scoring and ranking never fail. Errors only come from configuration
//! validation and from reading or writing persisted state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LearningError {
    /// A config value is out of range
    #[error("Invalid learning config: {0}")]
    InvalidConfig(String),

    /// State or config file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Feedback text that is not like / dislike / neutral
    #[error("Invalid feedback value: {0}")]
    InvalidFeedback(String),

    /// Weight key that is not `dimension:value`
    #[error("Invalid attribute key: {0}")]
    InvalidAttributeKey(String),
}

pub type Result<T> = std::result::Result<T, LearningError>;
