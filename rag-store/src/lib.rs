//! Semantic document store: ingestion, embedding, pgvector storage and nearest neighbours.
//!
//! The crate is split into focused modules:
//! - [`embed`]  : the embedding provider trait and the Ollama implementation
//! - [`store`]  : the vector store trait with Postgres/pgvector and in-memory backends
//! - [`extract`]: PDF / plain-text extraction with the partial-failure rules
//! - [`Ingestor`] and [`Retriever`]: the two pipelines built on top
//!
//! Distance is **cosine distance** everywhere (`0.0` = identical direction).

mod config;
pub mod embed;
mod errors;
pub mod extract;
mod filters;
mod ingest;
mod normalize;
pub mod record;
mod retrieve;
pub mod store;

pub use config::{MAX_TOP_K, RagConfig};
pub use embed::EmbeddingsProvider;
pub use errors::RagError;
pub use filters::ScopeFilter;
pub use ingest::{IngestReceipt, Ingestor, SUGGESTION_LIMIT};
pub use normalize::normalize_for_embedding;
pub use record::{
    DocumentId, DocumentPage, NewDocument, RagQuery, ScoredDocument, StoredDocument, Suggestion,
    preview,
};
pub use retrieve::Retriever;
pub use store::VectorStore;
