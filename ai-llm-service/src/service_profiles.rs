//! Shared model service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config; the cache lock is never held
//!   across a network call, so one slow request does not block the others.
//! - Every call is bounded by the profile's `timeout_secs`. Dropping the
//!   returned future cancels the in-flight HTTP request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_ollama_chat, config_ollama_embedding};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     config_ollama_chat()?,
//!     config_ollama_embedding()?,
//! ));
//!
//! let emb = svc.embed("Ferris").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::ollama_service::OllamaService,
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service from the two profiles. Clients are built lazily
    /// on first use.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
        }
    }

    /// Runs a single-turn completion on the **chat** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] on transport, status, decode or timeout failure.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, AiLlmError> {
        match self.chat.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.chat).await?;
                bounded(&self.chat, cli.chat(system, user)).await
            }
        }
    }

    /// Computes one embedding on the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] on transport, status, decode or timeout failure.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                bounded(&self.embedding, cli.embeddings(input)).await
            }
        }
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key) {
            return Ok(cli.clone());
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Applies the profile timeout to a client call.
async fn bounded<T, E>(
    cfg: &LlmModelConfig,
    fut: impl Future<Output = Result<T, E>>,
) -> Result<T, AiLlmError>
where
    AiLlmError: From<E>,
{
    let limit = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(AiLlmError::from),
        Err(_) => {
            warn!(model = %cfg.model, ?limit, "model call timed out");
            Err(AiLlmError::Timeout(limit))
        }
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    max_tokens: Option<u32>,
    temperature_bits: Option<u32>,
    top_p_bits: Option<u32>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature_bits: cfg.temperature.map(f32::to_bits),
            top_p_bits: cfg.top_p.map(f32::to_bits),
            timeout: cfg.timeout_secs,
        }
    }
}
