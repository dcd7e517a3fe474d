use crate::config::llm_provider::LlmProvider;

/// Configuration for a single model invocation profile.
///
/// One instance describes either the chat model or the embedding model.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "qwen2.5:3b".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     max_tokens: Some(512),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.model, "qwen2.5:3b");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The provider/backend.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"qwen2.5:3b"`, `"bge-m3"`).
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout in seconds. Also bounds the whole call in
    /// [`crate::LlmServiceProfiles`].
    pub timeout_secs: Option<u64>,
}
