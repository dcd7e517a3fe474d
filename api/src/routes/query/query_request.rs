use rag_store::ScopeFilter;
use serde::Deserialize;

/// Request payload for /query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question.
    pub question: String,
    /// Optional override of the number of documents retrieved.
    #[serde(default)]
    pub top_k: Option<usize>,
    /// Optional scope restriction. Omitted means the whole corpus is searched.
    #[serde(default)]
    pub scope: Option<ScopeFilter>,
}
