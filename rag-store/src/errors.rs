//! Unified error types for the crate.

use directory::DirectoryError;
use thiserror::Error;

use crate::record::DocumentId;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Content was empty or whitespace-only.
    #[error("content is empty")]
    ContentEmpty,

    /// PDF could not be parsed or yielded no text at all.
    #[error("could not extract text from PDF: {0}")]
    Extraction(String),

    /// Uploaded text was not valid UTF-8.
    #[error("text must be UTF-8 encoded: {0}")]
    Encoding(String),

    /// Upload had the wrong file type.
    #[error("unsupported file '{filename}': expected {expected}")]
    UnsupportedFile {
        filename: String,
        expected: &'static str,
    },

    /// Embedding model failed (timeout, transport, empty input after normalization).
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Embedding had the wrong dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// Scope resolution failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// No document with this id.
    #[error("document {0} not found")]
    DocumentNotFound(DocumentId),

    /// Storage or transaction failure; the enclosing transaction was rolled back.
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),
}
