//! POST /query: grounded answer over the document corpus.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, response::Response};
use contextor::AskOptions;
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::AppResult,
    routes::{query::query_request::QueryRequest, request_id},
};

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/query \
///   -H 'content-type: application/json' \
///   -d '{"question":"น้ำประปาไม่ไหลต้องทำอย่างไร"}'
/// ```
pub async fn query(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<QueryRequest>,
) -> AppResult<Response> {
    let request_id = request_id(&headers);
    debug!(%request_id, question = %body.question, "query: start");

    let opts = AskOptions {
        top_k: body.top_k,
        scope: body.scope,
    };
    let qa = state.answers.answer(&body.question, opts).await?;

    info!(%request_id, documents = qa.relevant_documents.len(), "query: answered");
    Ok(ok(qa))
}
