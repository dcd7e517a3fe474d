//! Ollama-backed model access shared by ingestion, retrieval and answer synthesis.
//!
//! - [`service_profiles::LlmServiceProfiles`] is the entry point: build it once,
//!   wrap it in `Arc`, and hand clones to whoever needs chat or embeddings.
//! - [`config::default_config`] reads the two profiles (chat, embedding) from env.
//! - [`telemetry`] provides a library-scoped `tracing` layer.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError};
pub use service_profiles::LlmServiceProfiles;
