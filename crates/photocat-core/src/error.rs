//! Error types for the photocat pipeline, catalog, and tagging session.
//!
//! Errors are organized by stage. Failures local to a single field or a
//! single file are absorbed by the pipeline (see [`PipelineError`]); failures
//! that would lose operator work surface as [`StoreError`] or [`SessionError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::types::LabelMode;

/// Top-level error type for photocat operations.
#[derive(Error, Debug)]
pub enum PhotocatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Catalog persistence errors
    #[error("Catalog error: {0}")]
    Store(#[from] StoreError),

    /// Tagging session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No supported image files under the library root
    #[error("No supported images found under {}", root.display())]
    DiscoveryEmpty { root: PathBuf },

    /// File could not be opened or read while hashing
    #[error("Cannot hash {}: {source}", path.display())]
    HashUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pixel data could not be decoded
    #[error("Could not open image {}: {message}", path.display())]
    UnreadableImage { path: PathBuf, message: String },

    /// A single EXIF field is absent or malformed
    #[error("EXIF field {field} missing in {}", path.display())]
    MetadataFieldMissing { path: PathBuf, field: &'static str },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

/// Catalog persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend rejected the operation or is unreachable
    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// The catalog location could not be prepared
    #[error("Catalog IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row does not satisfy the record invariants
    #[error("Corrupt catalog row: {0}")]
    Corrupt(String),
}

/// Tagging session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Persisting a record failed; pending tag state is preserved
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// A fatal pipeline failure (empty library, vanished file)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Vocabulary or other session settings are invalid
    #[error("Invalid session configuration: {0}")]
    Config(#[from] ConfigError),

    /// Category is not in the configured vocabulary
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Trigger key is not bound to any category
    #[error("No category bound to key '{0}'")]
    UnknownTrigger(char),

    /// Operation does not match the catalog's label mode
    #[error("{operation} is not available in {mode} mode")]
    ModeMismatch {
        operation: &'static str,
        mode: LabelMode,
    },

    /// Rating outside 0-4
    #[error("Rating must be between 0 and 4, got {0}")]
    InvalidRating(u8),

    /// No photo is currently materialized
    #[error("No photo is currently being viewed")]
    NoCurrentPhoto,
}

/// Convenience type alias for photocat results.
pub type Result<T> = std::result::Result<T, PhotocatError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Convenience type alias for catalog results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convenience type alias for session results.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
