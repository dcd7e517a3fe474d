/// Represents the provider (backend) used for model inference.
///
/// Only a local Ollama runtime is wired today. New backends are added as
/// variants here plus a client under [`crate::services`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
}
