//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The question was empty or whitespace-only.
    #[error("question is empty")]
    EmptyQuestion,

    /// Errors from the underlying rag-store crate (embedding, storage).
    #[error(transparent)]
    Rag(#[from] rag_store::RagError),

    /// The generation model failed (transport, timeout, malformed reply).
    /// Not retried.
    #[error("answer generation failed: {0}")]
    Generation(String),
}
