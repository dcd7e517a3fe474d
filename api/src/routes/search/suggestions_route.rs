//! GET /search/suggestions?query=

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use rag_store::Suggestion;
use serde::{Deserialize, Serialize};

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::AppResult,
};

#[derive(Debug, Deserialize)]
pub struct SuggestionsParams {
    #[serde(default)]
    pub query: String,
}

/// One suggestion, named like the documents in a query answer.
#[derive(Debug, Serialize)]
pub struct SuggestionItem {
    pub content_preview: String,
    #[serde(rename = "province")]
    pub province_name: String,
    #[serde(rename = "district")]
    pub district_name: String,
    #[serde(rename = "service")]
    pub service_name: String,
    pub province_id: i32,
    pub district_id: i32,
    pub service_id: i32,
}

impl From<Suggestion> for SuggestionItem {
    fn from(s: Suggestion) -> Self {
        Self {
            content_preview: s.content_preview,
            province_name: s.scope.province_name,
            district_name: s.scope.district_name,
            service_name: s.scope.service_name,
            province_id: s.scope.province_id,
            district_id: s.scope.district_id,
            service_id: s.scope.service_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<SuggestionItem>,
}

pub async fn search_suggestions(
    State(state): State<Arc<AppState>>,
    Query(p): Query<SuggestionsParams>,
) -> AppResult<Response> {
    let suggestions = state.ingestor.suggest(&p.query).await?;
    Ok(ok(SuggestionsResponse {
        suggestions: suggestions.into_iter().map(SuggestionItem::from).collect(),
    }))
}
