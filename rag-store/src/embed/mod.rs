//! Embedding abstraction.
//!
//! Async is required because real providers (Ollama) perform HTTP requests;
//! the boxed future keeps the trait object-safe so the pipelines can hold an
//! `Arc<dyn EmbeddingsProvider>`.

use futures::future::BoxFuture;

use crate::errors::RagError;

/// Provider interface for embedding generation.
///
/// Implementations must be deterministic for identical input and model
/// version, safe to call concurrently, and must return vectors of
/// [`EmbeddingsProvider::dim`] elements.
pub trait EmbeddingsProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>>;

    /// Dimensionality of every vector this provider returns.
    fn dim(&self) -> usize;
}

pub mod hashing;
pub mod ollama;
