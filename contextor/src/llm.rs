//! Generation backend seam.

use ai_llm_service::LlmServiceProfiles;
use futures::future::BoxFuture;

use crate::error::ContextorError;

/// Single-turn completion: `(system, user)` in, assistant text out.
pub trait AnswerGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, ContextorError>>;
}

/// The chat profile of the shared model service.
impl AnswerGenerator for LlmServiceProfiles {
    fn generate<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> BoxFuture<'a, Result<String, ContextorError>> {
        Box::pin(async move {
            self.chat(system, user)
                .await
                .map_err(|e| ContextorError::Generation(e.to_string()))
        })
    }
}
