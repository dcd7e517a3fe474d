//! Runtime configuration loaded from environment variables.

use tracing::warn;

/// Context assembly and response shaping knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextorConfig {
    /// Documents placed in the prompt, at most.
    pub max_docs: usize,
    /// Characters kept from each document in the prompt.
    pub doc_chars: usize,
    /// Characters of `content_preview` in answers.
    pub preview_chars: usize,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            max_docs: 3,
            doc_chars: 1000,
            preview_chars: 200,
        }
    }
}

impl ContextorConfig {
    /// Build from `CTX_MAX_DOCS`, `CTX_DOC_CHARS` and `PREVIEW_CHARS`.
    /// Unset or malformed values keep their defaults.
    ///
    /// # Example
    /// ```
    /// # use contextor::ContextorConfig;
    /// let cfg = ContextorConfig::from_env();
    /// assert!(cfg.max_docs >= 1);
    /// ```
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_docs: parse("CTX_MAX_DOCS", d.max_docs).max(1),
            doc_chars: parse("CTX_DOC_CHARS", d.doc_chars).max(1),
            preview_chars: parse("PREVIEW_CHARS", d.preview_chars),
        }
    }
}

fn parse<T: std::str::FromStr + Copy>(k: &str, dflt: T) -> T {
    match std::env::var(k) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!(var = k, value = %v, "ignoring malformed value");
            dflt
        }),
        Err(_) => dflt,
    }
}
