//! Error types for plotrag.

use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type for plotrag operations.
#[derive(Error, Debug)]
pub enum PlotRagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for plotrag operations.
pub type Result<T> = std::result::Result<T, PlotRagError>;
