//! Process-local [`VectorStore`] with a full-scan cosine ranking.
//!
//! Writes take a short exclusive lock; no lock is held across an await.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use directory::ScopeInfo;
use futures::future::{self, BoxFuture};

use super::{SUGGESTION_PREVIEW_CHARS, VectorStore, check_dim, cosine_distance};
use crate::{
    errors::RagError,
    filters::ScopeFilter,
    record::{
        DocumentId, DocumentPage, NewDocument, ScoredDocument, StoredDocument, Suggestion,
        truncate_chars,
    },
};

struct Row {
    content: String,
    scope: ScopeInfo,
    embedding: Vec<f32>,
    created_at: DateTime<Utc>,
}

impl Row {
    fn to_stored(&self, id: DocumentId) -> StoredDocument {
        StoredDocument {
            id,
            content: self.content.clone(),
            scope: self.scope.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Default)]
struct Inner {
    last_id: DocumentId,
    rows: BTreeMap<DocumentId, Row>,
}

/// In-memory store. Ids start at 1 and are never reused.
pub struct MemoryStore {
    dim: usize,
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn insert(&self, doc: NewDocument) -> Result<DocumentId, RagError> {
        check_dim(self.dim, &doc.embedding)?;
        let mut g = self.write();
        g.last_id += 1;
        let id = g.last_id;
        g.rows.insert(
            id,
            Row {
                content: doc.content,
                scope: doc.scope,
                embedding: doc.embedding,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> Result<Vec<ScoredDocument>, RagError> {
        check_dim(self.dim, query)?;
        let f = filter.unwrap_or_default();
        let g = self.read();

        let mut hits: Vec<ScoredDocument> = g
            .rows
            .iter()
            .filter(|(_, r)| f.matches(&r.scope))
            .map(|(id, r)| ScoredDocument {
                id: *id,
                content: r.content.clone(),
                scope: r.scope.clone(),
                distance: cosine_distance(query, &r.embedding),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        hits.truncate(k);
        Ok(hits)
    }

    fn page(&self, filter: ScopeFilter, limit: i64, offset: i64) -> DocumentPage {
        let g = self.read();
        let mut matching: Vec<StoredDocument> = g
            .rows
            .iter()
            .filter(|(_, r)| filter.matches(&r.scope))
            .map(|(id, r)| r.to_stored(*id))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let documents = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        DocumentPage {
            documents,
            total,
            limit,
            offset,
        }
    }

    fn matching(&self, needle: &str, limit: usize) -> Vec<Suggestion> {
        let needle = needle.to_lowercase();
        let g = self.read();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for r in g.rows.values() {
            if out.len() == limit {
                break;
            }
            if !r.content.to_lowercase().contains(&needle) {
                continue;
            }
            let preview = truncate_chars(&r.content, SUGGESTION_PREVIEW_CHARS).to_string();
            if seen.insert((preview.clone(), r.scope.service_id)) {
                out.push(Suggestion {
                    content_preview: preview,
                    scope: r.scope.clone(),
                });
            }
        }
        out
    }
}

impl VectorStore for MemoryStore {
    fn dim(&self) -> usize {
        self.dim
    }

    fn store(&self, doc: NewDocument) -> BoxFuture<'_, Result<DocumentId, RagError>> {
        Box::pin(future::ready(self.insert(doc)))
    }

    fn nearest_neighbors<'a>(
        &'a self,
        query: &'a [f32],
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> BoxFuture<'a, Result<Vec<ScoredDocument>, RagError>> {
        Box::pin(future::ready(self.search(query, k, filter)))
    }

    fn get(&self, id: DocumentId) -> BoxFuture<'_, Result<StoredDocument, RagError>> {
        let res = self
            .read()
            .rows
            .get(&id)
            .map(|r| r.to_stored(id))
            .ok_or(RagError::DocumentNotFound(id));
        Box::pin(future::ready(res))
    }

    fn delete(&self, id: DocumentId) -> BoxFuture<'_, Result<(), RagError>> {
        let res = match self.write().rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RagError::DocumentNotFound(id)),
        };
        Box::pin(future::ready(res))
    }

    fn list(
        &self,
        filter: ScopeFilter,
        limit: i64,
        offset: i64,
    ) -> BoxFuture<'_, Result<DocumentPage, RagError>> {
        Box::pin(future::ready(Ok(self.page(filter, limit, offset))))
    }

    fn count(&self, filter: ScopeFilter) -> BoxFuture<'_, Result<i64, RagError>> {
        let n = self
            .read()
            .rows
            .values()
            .filter(|r| filter.matches(&r.scope))
            .count();
        Box::pin(future::ready(Ok(n as i64)))
    }

    fn suggest<'a>(
        &'a self,
        needle: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Suggestion>, RagError>> {
        Box::pin(future::ready(Ok(self.matching(needle, limit))))
    }
}
