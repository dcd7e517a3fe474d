//! Postgres + pgvector backend.
//!
//! Every write runs in its own transaction; readers rely on Postgres
//! isolation. Rows are decoded into typed records right here so untyped
//! rows never leave this module.

use chrono::{DateTime, Utc};
use directory::ScopeInfo;
use futures::FutureExt;
use futures::future::BoxFuture;
use pgvector::Vector;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use super::{SUGGESTION_PREVIEW_CHARS, VectorStore, check_dim};
use crate::{
    errors::RagError,
    filters::ScopeFilter,
    record::{DocumentId, DocumentPage, NewDocument, ScoredDocument, StoredDocument, Suggestion},
};

const SCOPE_COLUMNS: &str = "s.id AS service_id, dt.id AS district_id, p.id AS province_id, \
     s.name AS service_name, dt.name AS district_name, p.name AS province_name";

const SCOPE_JOIN: &str = "FROM documents d \
     JOIN services s ON d.service_id = s.id \
     JOIN districts dt ON s.district_id = dt.id \
     JOIN provinces p ON dt.province_id = p.id";

/// Creates the `vector` extension and the `documents` table.
///
/// Requires the hierarchy schema (`services`) to exist.
pub async fn init_schema(pool: &PgPool, dim: usize) -> Result<(), RagError> {
    let mut tx = pool.begin().await?;
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS documents (
            id SERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            service_id INTEGER NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            embedding vector({dim}) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )"
    ))
    .execute(&mut *tx)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_document_service ON documents(service_id)")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    info!(dim, "document schema ready");
    Ok(())
}

/// `WHERE`-fragment for a [`ScopeFilter`] bound at `$first..$first+2`.
fn scope_predicate(first: usize) -> String {
    format!(
        "(${a}::int4 IS NULL OR p.id = ${a}) \
         AND (${b}::int4 IS NULL OR dt.id = ${b}) \
         AND (${c}::int4 IS NULL OR s.id = ${c})",
        a = first,
        b = first + 1,
        c = first + 2
    )
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: i32,
    content: String,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    scope: ScopeInfo,
}

impl From<DocumentRow> for StoredDocument {
    fn from(r: DocumentRow) -> Self {
        Self {
            id: r.id,
            content: r.content,
            scope: r.scope,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NeighborRow {
    id: i32,
    content: String,
    distance: f64,
    #[sqlx(flatten)]
    scope: ScopeInfo,
}

impl From<NeighborRow> for ScoredDocument {
    fn from(r: NeighborRow) -> Self {
        Self {
            id: r.id,
            content: r.content,
            scope: r.scope,
            distance: r.distance,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SuggestionRow {
    content_preview: String,
    #[sqlx(flatten)]
    scope: ScopeInfo,
}

/// pgvector-backed [`VectorStore`].
#[derive(Clone)]
pub struct PgVectorStore {
    pool: PgPool,
    dim: usize,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, dim: usize) -> Self {
        Self { pool, dim }
    }

    #[instrument(skip_all, fields(service_id = doc.scope.service_id))]
    async fn insert(&self, doc: NewDocument) -> Result<DocumentId, RagError> {
        check_dim(self.dim, &doc.embedding)?;

        let mut tx = self.pool.begin().await?;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO documents (content, service_id, embedding) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&doc.content)
        .bind(doc.scope.service_id)
        .bind(Vector::from(doc.embedding))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(id, "document stored");
        Ok(id)
    }

    async fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> Result<Vec<ScoredDocument>, RagError> {
        check_dim(self.dim, query)?;
        let f = filter.unwrap_or_default();
        let sql = format!(
            "SELECT d.id, d.content, (d.embedding <=> $1) AS distance, {SCOPE_COLUMNS} \
             {SCOPE_JOIN} WHERE {} \
             ORDER BY distance ASC, d.id ASC LIMIT $5",
            scope_predicate(2)
        );

        let rows = sqlx::query_as::<_, NeighborRow>(&sql)
            .bind(Vector::from(query.to_vec()))
            .bind(f.province_id)
            .bind(f.district_id)
            .bind(f.service_id)
            .bind(i64::try_from(k).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ScoredDocument::from).collect())
    }

    async fn fetch(&self, id: DocumentId) -> Result<StoredDocument, RagError> {
        let sql = format!(
            "SELECT d.id, d.content, d.created_at, {SCOPE_COLUMNS} {SCOPE_JOIN} WHERE d.id = $1"
        );
        sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(StoredDocument::from)
            .ok_or(RagError::DocumentNotFound(id))
    }

    async fn remove(&self, id: DocumentId) -> Result<(), RagError> {
        let mut tx = self.pool.begin().await?;
        let res = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RagError::DocumentNotFound(id));
        }
        tx.commit().await?;
        info!(id, "document deleted");
        Ok(())
    }

    async fn page(
        &self,
        filter: ScopeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<DocumentPage, RagError> {
        let sql = format!(
            "SELECT d.id, d.content, d.created_at, {SCOPE_COLUMNS} {SCOPE_JOIN} WHERE {} \
             ORDER BY d.created_at DESC, d.id DESC LIMIT $4 OFFSET $5",
            scope_predicate(1)
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(filter.province_id)
            .bind(filter.district_id)
            .bind(filter.service_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total = self.total(filter).await?;
        Ok(DocumentPage {
            documents: rows.into_iter().map(StoredDocument::from).collect(),
            total,
            limit,
            offset,
        })
    }

    async fn total(&self, filter: ScopeFilter) -> Result<i64, RagError> {
        let sql = format!("SELECT COUNT(*) {SCOPE_JOIN} WHERE {}", scope_predicate(1));
        let n: i64 = sqlx::query_scalar(&sql)
            .bind(filter.province_id)
            .bind(filter.district_id)
            .bind(filter.service_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn matching(&self, needle: &str, limit: usize) -> Result<Vec<Suggestion>, RagError> {
        let sql = format!(
            "SELECT DISTINCT SUBSTRING(d.content FROM 1 FOR {SUGGESTION_PREVIEW_CHARS}) \
             AS content_preview, {SCOPE_COLUMNS} {SCOPE_JOIN} \
             WHERE strpos(lower(d.content), lower($1)) > 0 LIMIT $2"
        );
        let rows = sqlx::query_as::<_, SuggestionRow>(&sql)
            .bind(needle)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| Suggestion {
                content_preview: r.content_preview,
                scope: r.scope,
            })
            .collect())
    }
}

impl VectorStore for PgVectorStore {
    fn dim(&self) -> usize {
        self.dim
    }

    fn store(&self, doc: NewDocument) -> BoxFuture<'_, Result<DocumentId, RagError>> {
        self.insert(doc).boxed()
    }

    fn nearest_neighbors<'a>(
        &'a self,
        query: &'a [f32],
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredDocument>, RagError>> {
        self.search(query, k, filter).boxed()
    }

    fn get(&self, id: DocumentId) -> BoxFuture<'_, Result<StoredDocument, RagError>> {
        self.fetch(id).boxed()
    }

    fn delete(&self, id: DocumentId) -> BoxFuture<'_, Result<(), RagError>> {
        self.remove(id).boxed()
    }

    fn list(
        &self,
        filter: ScopeFilter,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, Result<DocumentPage, RagError>> {
        self.page(filter, limit, offset).boxed()
    }

    fn count(&self, filter: ScopeFilter) -> BoxFuture<'_, Result<i64, RagError>> {
        self.total(filter).boxed()
    }

    fn suggest<'a>(
        &'a self,
        needle: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Suggestion>, RagError>> {
        self.matching(needle, limit).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_predicate_numbers_placeholders_from_offset() {
        let p = scope_predicate(2);
        assert!(p.contains("$2::int4 IS NULL OR p.id = $2"));
        assert!(p.contains("$3::int4 IS NULL OR dt.id = $3"));
        assert!(p.contains("$4::int4 IS NULL OR s.id = $4"));
    }
}
