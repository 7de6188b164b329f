//! Error types for wxwrapped-core

use thiserror::Error;

/// Main error type for the wxwrapped-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Chat database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Date or record that cannot be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Category name that cannot produce a usable slug
    #[error("invalid category name: {0:?}")]
    InvalidName(String),

    /// A category with this slug is already in the store
    #[error("category already exists: {0}")]
    DuplicateSlug(String),

    /// No category with this slug
    #[error("category not found: {0}")]
    CategoryNotFound(String),
}

/// Result type alias for wxwrapped-core
pub type Result<T> = std::result::Result<T, Error>;
