//! Durable keyed storage of documents with nearest-neighbour queries.
//!
//! Two backends implement [`VectorStore`]:
//! - [`postgres::PgVectorStore`]: Postgres + pgvector, one transaction per write
//! - [`memory::MemoryStore`]: process-local full scan, for tests and small embedded corpora
//!
//! Both rank by cosine distance and scan the full corpus; no sub-linear index
//! is assumed.

use futures::future::BoxFuture;

use crate::{
    errors::RagError,
    filters::ScopeFilter,
    record::{DocumentId, DocumentPage, NewDocument, ScoredDocument, StoredDocument, Suggestion},
};

pub mod memory;
pub mod postgres;

/// Characters kept in a suggestion preview.
pub const SUGGESTION_PREVIEW_CHARS: usize = 100;

/// Storage contract used by the ingestion and retrieval pipelines.
pub trait VectorStore: Send + Sync {
    /// Dimensionality every stored embedding must have.
    fn dim(&self) -> usize;

    /// Persists one document atomically and returns its id.
    fn store(&self, doc: NewDocument) -> BoxFuture<'_, Result<DocumentId, RagError>>;

    /// Returns up to `k` documents ordered by ascending cosine distance to `query`
    /// (ties broken by id). An empty corpus yields an empty vector.
    fn nearest_neighbors<'a>(
        &'a self,
        query: &'a [f32],
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredDocument>, RagError>>;

    /// Fetches one document.
    fn get(&self, id: DocumentId) -> BoxFuture<'_, Result<StoredDocument, RagError>>;

    /// Deletes one document.
    fn delete(&self, id: DocumentId) -> BoxFuture<'_, Result<(), RagError>>;

    /// Lists documents newest first.
    fn list(
        &self,
        filter: ScopeFilter,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, Result<DocumentPage, RagError>>;

    /// Counts documents matching `filter`.
    fn count(&self, filter: ScopeFilter) -> BoxFuture<'_, Result<i64, RagError>>;

    /// Case-insensitive substring match over content, at most `limit` distinct previews.
    fn suggest<'a>(
        &'a self,
        needle: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Suggestion>, RagError>>;
}

/// Rejects vectors whose size differs from the store dimension.
pub(crate) fn check_dim(want: usize, v: &[f32]) -> Result<(), RagError> {
    if v.len() == want {
        Ok(())
    } else {
        Err(RagError::DimensionMismatch { got: v.len(), want })
    }
}

/// Cosine distance `1 - cos(a, b)` clamped to `[0, 2]`; a zero vector gives `1.0`.
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut na, mut nb) = (0f64, 0f64, 0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (na.sqrt() * nb.sqrt())).clamp(0.0, 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_distance() {
        let v = [0.3, -1.2, 4.0];
        assert!(cosine_distance(&v, &v).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_and_opposite_vectors() {
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-9);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn distance_ignores_magnitude() {
        let d = cosine_distance(&[1.0, 2.0], &[10.0, 20.0]);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn dimension_check() {
        assert!(check_dim(3, &[0.0; 3]).is_ok());
        assert!(matches!(
            check_dim(3, &[0.0; 2]),
            Err(RagError::DimensionMismatch { got: 2, want: 3 })
        ));
    }
}
