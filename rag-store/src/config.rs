//! Runtime configuration for ingestion and retrieval.

use crate::errors::RagError;

/// Upper bound on `k` accepted from callers.
pub const MAX_TOP_K: usize = 50;

/// Configuration for ingestion and retrieval.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Fixed embedding dimensionality `D`; every stored vector has this size.
    pub embedding_dim: usize,
    /// Cap on normalized characters sent to the embedding model.
    pub embed_max_chars: usize,
    /// `k` used when a caller does not ask for a specific one.
    pub default_top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 1024,
            embed_max_chars: 8000,
            default_top_k: 1,
        }
    }
}

impl RagConfig {
    /// Reads `EMBEDDING_DIM`, `EMBED_MAX_CHARS` and `RAG_TOP_K`, keeping the
    /// defaults for unset variables.
    ///
    /// # Errors
    /// `RagError::Config` for values that are not positive integers.
    pub fn from_env() -> Result<Self, RagError> {
        let d = Self::default();
        let cfg = Self {
            embedding_dim: parse_env("EMBEDDING_DIM", d.embedding_dim)?,
            embed_max_chars: parse_env("EMBED_MAX_CHARS", d.embed_max_chars)?,
            default_top_k: parse_env("RAG_TOP_K", d.default_top_k)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.embedding_dim == 0 {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        if self.embed_max_chars == 0 {
            return Err(RagError::Config("embed_max_chars must be > 0".into()));
        }
        if self.default_top_k == 0 || self.default_top_k > MAX_TOP_K {
            return Err(RagError::Config(format!(
                "default_top_k must be in 1..={MAX_TOP_K}"
            )));
        }
        Ok(())
    }
}

fn parse_env(key: &str, default: usize) -> Result<usize, RagError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<usize>()
            .map_err(|_| RagError::Config(format!("{key} must be a positive integer, got '{v}'"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let cfg = RagConfig::default();
        assert_eq!(cfg.embedding_dim, 1024);
        assert_eq!(cfg.default_top_k, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_k_is_rejected() {
        let cfg = RagConfig {
            default_top_k: 0,
            ..RagConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
