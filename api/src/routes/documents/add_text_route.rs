//! POST /add/text: ingests a JSON text body.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::Response,
};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::AppResult,
    routes::{
        documents::{documents_request::AddTextRequest, documents_response::IngestResponse},
        request_id,
    },
};

/// Handler: POST /add/text
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/add/text \
///   -H 'content-type: application/json' \
///   -d '{"text":"ชำระค่าน้ำประปาได้ที่สำนักงานเขต","service_id":5}'
/// ```
pub async fn add_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AddTextRequest>,
) -> AppResult<Response> {
    let receipt = state
        .ingestor
        .ingest_text(body.text, body.service_id)
        .await?;

    info!(
        request_id = %request_id(&headers),
        document_id = receipt.document_id,
        "add_text: stored"
    );
    Ok(ok(IngestResponse::new(receipt, "Document added successfully")))
}
