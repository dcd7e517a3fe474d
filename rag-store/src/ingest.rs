//! Ingestion pipeline: validate → resolve scope → extract → embed → persist.
//!
//! A document row is written only after its embedding was computed and
//! matched the store dimension. Embedding failures leave the store untouched;
//! a failed write discards the embedding.

use std::sync::Arc;

use directory::{ScopeInfo, ServiceDirectory, ServiceId};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    embed::EmbeddingsProvider,
    errors::RagError,
    extract::{decode_text, extract_pdf_text},
    filters::ScopeFilter,
    record::{DocumentId, DocumentPage, NewDocument, StoredDocument, Suggestion},
    store::VectorStore,
};

/// Suggestions returned per query.
pub const SUGGESTION_LIMIT: usize = 10;
/// Shortest trimmed query for which suggestions are computed.
pub const SUGGESTION_MIN_CHARS: usize = 2;
/// Upper bound on a listing page.
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Result of a successful ingestion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IngestReceipt {
    pub document_id: DocumentId,
    pub scope: ScopeInfo,
}

/// Write-side (and read-side management) entry point for documents.
#[derive(Clone)]
pub struct Ingestor {
    embedder: Arc<dyn EmbeddingsProvider>,
    store: Arc<dyn VectorStore>,
    directory: Arc<dyn ServiceDirectory>,
}

impl Ingestor {
    /// Wires the pipeline.
    ///
    /// # Errors
    /// `RagError::Config` when the embedder and the store disagree on `D`.
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        store: Arc<dyn VectorStore>,
        directory: Arc<dyn ServiceDirectory>,
    ) -> Result<Self, RagError> {
        if embedder.dim() != store.dim() {
            return Err(RagError::Config(format!(
                "embedder dimension {} differs from store dimension {}",
                embedder.dim(),
                store.dim()
            )));
        }
        Ok(Self {
            embedder,
            store,
            directory,
        })
    }

    /// Embeds and persists `content` under an already resolved scope.
    #[instrument(skip_all, fields(service_id = scope.service_id, len = content.len()))]
    pub async fn ingest(&self, content: String, scope: &ScopeInfo) -> Result<DocumentId, RagError> {
        if content.trim().is_empty() {
            return Err(RagError::ContentEmpty);
        }

        let embedding = self.embedder.embed(&content).await?;
        debug!(dim = embedding.len(), "embedding computed");

        let id = self
            .store
            .store(NewDocument {
                content,
                scope: scope.clone(),
                embedding,
            })
            .await?;

        info!(document_id = id, "document stored");
        Ok(id)
    }

    /// Ingests raw text for a service.
    pub async fn ingest_text(
        &self,
        content: String,
        service_id: ServiceId,
    ) -> Result<IngestReceipt, RagError> {
        if content.trim().is_empty() {
            return Err(RagError::ContentEmpty);
        }
        let scope = self.directory.resolve_service(service_id).await?;
        self.finish(content, scope).await
    }

    /// Ingests the text of a PDF. Unreadable pages are skipped.
    pub async fn ingest_pdf(
        &self,
        bytes: Vec<u8>,
        service_id: ServiceId,
    ) -> Result<IngestReceipt, RagError> {
        let scope = self.directory.resolve_service(service_id).await?;
        let content = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| RagError::Extraction(format!("extraction task failed: {e}")))??;
        debug!(chars = content.chars().count(), "pdf text extracted");
        self.finish(content, scope).await
    }

    /// Ingests an uploaded UTF-8 text file.
    pub async fn ingest_uploaded_text(
        &self,
        bytes: Vec<u8>,
        service_id: ServiceId,
    ) -> Result<IngestReceipt, RagError> {
        let content = decode_text(bytes)?;
        let scope = self.directory.resolve_service(service_id).await?;
        self.finish(content, scope).await
    }

    async fn finish(&self, content: String, scope: ScopeInfo) -> Result<IngestReceipt, RagError> {
        let document_id = self.ingest(content, &scope).await?;
        Ok(IngestReceipt { document_id, scope })
    }

    pub async fn get_document(&self, id: DocumentId) -> Result<StoredDocument, RagError> {
        self.store.get(id).await
    }

    pub async fn delete_document(&self, id: DocumentId) -> Result<(), RagError> {
        self.store.delete(id).await?;
        info!(document_id = id, "document deleted");
        Ok(())
    }

    /// Newest-first listing; `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn list_documents(
        &self,
        filter: ScopeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<DocumentPage, RagError> {
        self.store
            .list(filter, limit.clamp(1, MAX_PAGE_SIZE), offset.max(0))
            .await
    }

    pub async fn count_documents(&self, filter: ScopeFilter) -> Result<i64, RagError> {
        self.store.count(filter).await
    }

    /// Case-insensitive content suggestions. Short queries yield nothing.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, RagError> {
        let q = query.trim();
        if q.chars().count() < SUGGESTION_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.store.suggest(q, SUGGESTION_LIMIT).await
    }
}
