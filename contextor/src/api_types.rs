//! Public API types re-used by external crates (e.g., the HTTP API layer).

use rag_store::{ScopeFilter, ScoredDocument, preview};
use serde::Serialize;

/// Per-question knobs.
///
/// Both fields default to "not set": `top_k` falls back to `RAG_TOP_K`, and
/// no scope filter means the whole corpus is searched.
///
/// # Example
/// ```
/// use contextor::AskOptions;
/// let opts = AskOptions { top_k: Some(3), ..Default::default() };
/// assert!(opts.scope.is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AskOptions {
    pub top_k: Option<usize>,
    pub scope: Option<ScopeFilter>,
}

/// A retrieved document as reported back to the caller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelevantDocument {
    pub id: i32,
    pub content_preview: String,
    #[serde(rename = "province")]
    pub province_name: String,
    #[serde(rename = "district")]
    pub district_name: String,
    #[serde(rename = "service")]
    pub service_name: String,
    /// Cosine distance to the question; lower is closer.
    pub similarity_score: f64,
    pub province_id: i32,
    pub district_id: i32,
    pub service_id: i32,
}

impl RelevantDocument {
    pub(crate) fn from_scored(doc: &ScoredDocument, preview_chars: usize) -> Self {
        Self {
            id: doc.id,
            content_preview: preview(&doc.content, preview_chars),
            province_name: doc.scope.province_name.clone(),
            district_name: doc.scope.district_name.clone(),
            service_name: doc.scope.service_name.clone(),
            similarity_score: doc.distance,
            province_id: doc.scope.province_id,
            district_id: doc.scope.district_id,
            service_id: doc.scope.service_id,
        }
    }
}

/// Final answer together with the documents it was grounded on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub relevant_documents: Vec<RelevantDocument>,
}
