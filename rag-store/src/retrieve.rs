//! Retrieval: embed the question, then rank stored documents by cosine distance.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    config::MAX_TOP_K,
    embed::EmbeddingsProvider,
    errors::RagError,
    filters::ScopeFilter,
    record::{RagQuery, ScoredDocument},
    store::VectorStore,
};

/// Read-side pipeline over a [`VectorStore`].
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingsProvider>,
    store: Arc<dyn VectorStore>,
    default_k: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        store: Arc<dyn VectorStore>,
        default_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            default_k: clamp_k(default_k),
        }
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Top-`k` documents for `text` over the whole corpus.
    pub async fn retrieve(&self, text: &str, k: usize) -> Result<Vec<ScoredDocument>, RagError> {
        self.run(text, clamp_k(k), None).await
    }

    /// Full form: optional `k` override and optional scope filter.
    pub async fn retrieve_query(&self, q: RagQuery<'_>) -> Result<Vec<ScoredDocument>, RagError> {
        let k = q.top_k.map_or(self.default_k, clamp_k);
        self.run(q.text, k, q.filter.filter(|f| !f.is_empty())).await
    }

    #[instrument(skip_all, fields(k = k, filtered = filter.is_some()))]
    async fn run(
        &self,
        text: &str,
        k: usize,
        filter: Option<ScopeFilter>,
    ) -> Result<Vec<ScoredDocument>, RagError> {
        let query = self.embedder.embed(text).await?;
        let hits = self.store.nearest_neighbors(&query, k, filter).await?;
        debug!(hits = hits.len(), best = hits.first().map(|h| h.distance), "retrieved");
        Ok(hits)
    }
}

fn clamp_k(k: usize) -> usize {
    k.clamp(1, MAX_TOP_K)
}

#[cfg(test)]
mod tests {
    use directory::ScopeInfo;

    use super::*;
    use crate::embed::hashing::HashingEmbedder;
    use crate::record::NewDocument;
    use crate::store::memory::MemoryStore;

    const DIM: usize = 64;

    fn scope(service_id: i32) -> ScopeInfo {
        ScopeInfo {
            service_id,
            district_id: service_id * 10,
            province_id: 1,
            service_name: format!("s{service_id}"),
            district_name: "d".into(),
            province_name: "p".into(),
        }
    }

    async fn seeded() -> (Retriever, Vec<i32>) {
        let emb = Arc::new(HashingEmbedder::new(DIM));
        let store = Arc::new(MemoryStore::new(DIM));
        let texts = [
            ("passport renewal requires the old passport", 1),
            ("water bill can be paid at the district office", 2),
            ("building permit applications take thirty days", 3),
        ];
        let mut ids = Vec::new();
        for (t, s) in texts {
            let embedding = emb.embed(t).await.unwrap();
            let id = store
                .store(NewDocument {
                    content: t.into(),
                    scope: scope(s),
                    embedding,
                })
                .await
                .unwrap();
            ids.push(id);
        }
        (Retriever::new(emb, store, 1), ids)
    }

    #[tokio::test]
    async fn empty_corpus_returns_empty() {
        let r = Retriever::new(
            Arc::new(HashingEmbedder::new(DIM)),
            Arc::new(MemoryStore::new(DIM)),
            3,
        );
        assert!(r.retrieve("anything", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn document_text_retrieves_itself_first() {
        let (r, ids) = seeded().await;
        let hits = r
            .retrieve("water bill can be paid at the district office", 3)
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, ids[1]);
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[tokio::test]
    async fn default_k_is_used_when_not_overridden() {
        let (r, _) = seeded().await;
        let hits = r
            .retrieve_query(RagQuery {
                text: "passport",
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn k_is_clamped() {
        let (r, _) = seeded().await;
        assert_eq!(r.retrieve("passport", 0).await.unwrap().len(), 1);
        assert_eq!(r.retrieve("passport", 10_000).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn filter_is_opt_in() {
        let (r, ids) = seeded().await;
        let text = "passport renewal requires the old passport";

        let open = r.retrieve(text, 1).await.unwrap();
        assert_eq!(open[0].id, ids[0]);

        let scoped = r
            .retrieve_query(RagQuery {
                text,
                top_k: Some(1),
                filter: Some(ScopeFilter {
                    service_id: Some(3),
                    ..Default::default()
                }),
            })
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, ids[2]);
    }
}
