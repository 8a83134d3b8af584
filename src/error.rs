//! Error types for the textmill library.
//!
//! This module defines all error types that can occur while loading,
//! transforming, and persisting pipeline documents.

/// Result type alias for textmill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while reading a source document or writing an artifact
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact could not be serialized or deserialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required input document is structurally unusable
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A table-of-contents specification is unusable
    #[error("Invalid TOC spec: {0}")]
    InvalidTocSpec(String),

    /// Bad command line or pipeline configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
