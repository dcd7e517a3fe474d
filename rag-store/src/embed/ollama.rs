//! Ollama embedding provider implementation.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;
use tracing::{debug, instrument};

use crate::{EmbeddingsProvider, RagError, normalize::normalize_for_embedding};

/// Configuration for the Ollama embedding backend.
#[derive(Clone)]
pub struct OllamaConfig {
    pub svc: Arc<LlmServiceProfiles>,
    /// Expected embedding dimension size.
    pub dim: usize,
    /// Cap on normalized characters sent to the model.
    pub max_chars: usize,
}

/// Ollama embedding provider (async).
///
/// Normalizes text, calls the shared embedding profile and enforces the
/// configured dimension.
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
    max_chars: usize,
}

impl OllamaEmbedder {
    /// Construct a new embedder from configuration.
    pub fn new(cfg: OllamaConfig) -> Self {
        Self {
            svc: cfg.svc,
            dim: cfg.dim,
            max_chars: cfg.max_chars,
        }
    }

    #[instrument(skip_all, fields(dim = self.dim))]
    async fn embed_normalized(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let input = normalize_for_embedding(text, self.max_chars);
        if input.is_empty() {
            return Err(RagError::Embedding(
                "nothing to embed after normalization".into(),
            ));
        }

        let v = self
            .svc
            .embed(&input)
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        if v.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                got: v.len(),
                want: self.dim,
            });
        }

        debug!(chars = input.chars().count(), "embedded");
        Ok(v)
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        Box::pin(self.embed_normalized(text))
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
