//! Document read side: list, count, get, delete.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use rag_store::{DocumentId, ScopeFilter};
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::AppResult,
    routes::{
        documents::{
            documents_request::{ListDocumentsParams, ScopeParams},
            documents_response::{DeleteResponse, DocumentCountResponse},
        },
        request_id,
    },
};

/// Handler: GET /documents?province_id=&district_id=&service_id=&limit=10&offset=0
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(p): Query<ListDocumentsParams>,
) -> AppResult<Response> {
    let page = state
        .ingestor
        .list_documents(p.filter(), p.limit, p.offset)
        .await?;
    debug!(returned = page.documents.len(), total = page.total, "list_documents");
    Ok(ok(page))
}

/// Handler: GET /documents/count
pub async fn count_documents(
    State(state): State<Arc<AppState>>,
    Query(p): Query<ScopeParams>,
) -> AppResult<Response> {
    let filter = ScopeFilter::from(&p);
    let total = state.ingestor.count_documents(filter).await?;
    Ok(ok(DocumentCountResponse::new(total, filter)))
}

/// Handler: GET /documents/{id}
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocumentId>,
) -> AppResult<Response> {
    let doc = state.ingestor.get_document(id).await?;
    Ok(ok(doc))
}

/// Handler: DELETE /documents/{id}
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<DocumentId>,
) -> AppResult<Response> {
    state.ingestor.delete_document(id).await?;
    info!(request_id = %request_id(&headers), document_id = id, "delete_document");
    Ok(ok(DeleteResponse {
        id,
        message: "Document deleted",
    }))
}
