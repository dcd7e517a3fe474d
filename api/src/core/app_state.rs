use std::sync::Arc;

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_ollama_chat, config_ollama_embedding},
    error_handler::{env_or, must_env},
};
use contextor::{AnswerEngine, ContextorConfig};
use directory::PgDirectory;
use queue_booking::{PgLedger, QueueAllocator};
use rag_store::{
    Ingestor, RagConfig, Retriever,
    embed::ollama::{OllamaConfig, OllamaEmbedder},
    store::postgres::PgVectorStore,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document ingestion and management.
    pub ingestor: Ingestor,
    /// Retrieval + answer synthesis.
    pub answers: AnswerEngine,
    /// Queue ticket booking.
    pub queue: Arc<QueueAllocator>,
}

impl AppState {
    pub fn new(ingestor: Ingestor, answers: AnswerEngine, queue: Arc<QueueAllocator>) -> Self {
        Self {
            ingestor,
            answers,
            queue,
        }
    }

    /// Connects to Postgres, bootstraps the schema and wires the pipelines
    /// from environment variables.
    pub async fn from_env() -> Result<Self, AppError> {
        let database_url = must_env("DATABASE_URL")?;
        let max_connections = env_or("DB_MAX_CONNECTIONS", "10")
            .trim()
            .parse::<u32>()
            .map_err(|_| {
                AppError::Startup("DB_MAX_CONNECTIONS must be a positive integer".into())
            })?;

        let rag_cfg = RagConfig::from_env()?;
        let ctx_cfg = ContextorConfig::from_env();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(&database_url)
            .await?;

        directory::init_schema(&pool).await?;
        rag_store::store::postgres::init_schema(&pool, rag_cfg.embedding_dim).await?;
        queue_booking::init_schema(&pool).await?;
        info!(dim = rag_cfg.embedding_dim, "database schema ready");

        let llm = Arc::new(LlmServiceProfiles::new(
            config_ollama_chat()?,
            config_ollama_embedding()?,
        ));
        let (chat, embedding) = llm.profiles();
        info!(chat = %chat.model, embedding = %embedding.model, "model profiles loaded");

        let embedder = Arc::new(OllamaEmbedder::new(OllamaConfig {
            svc: llm.clone(),
            dim: rag_cfg.embedding_dim,
            max_chars: rag_cfg.embed_max_chars,
        }));
        let store = Arc::new(PgVectorStore::new(pool.clone(), rag_cfg.embedding_dim));
        let directory = Arc::new(PgDirectory::new(pool.clone()));

        let ingestor = Ingestor::new(embedder.clone(), store.clone(), directory.clone())?;
        let retriever = Retriever::new(embedder, store, rag_cfg.default_top_k);
        let answers = AnswerEngine::new(retriever, llm, ctx_cfg);
        let queue = Arc::new(QueueAllocator::new(
            Arc::new(PgLedger::new(pool)),
            directory,
        ));

        Ok(Self::new(ingestor, answers, queue))
    }
}
