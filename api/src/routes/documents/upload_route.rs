//! POST /upload/pdf and POST /upload/text (multipart: `file`, `service_id`).

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    response::Response,
};
use directory::ServiceId;
use rag_store::extract::SourceKind;
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::{AppError, AppResult},
    routes::{documents::documents_response::IngestResponse, request_id},
};

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

struct Upload {
    filename: String,
    bytes: Vec<u8>,
    service_id: ServiceId,
}

async fn read_upload(mut form: Multipart) -> AppResult<Upload> {
    let mut file = None;
    let mut service_id = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("service_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                let id = raw.trim().parse::<ServiceId>().map_err(|_| {
                    AppError::BadRequest(format!("service_id must be an integer, got '{raw}'"))
                })?;
                service_id = Some(id);
            }
            other => debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::BadRequest("missing multipart field `file`".into()))?;
    let service_id = service_id
        .ok_or_else(|| AppError::BadRequest("missing multipart field `service_id`".into()))?;

    Ok(Upload {
        filename,
        bytes,
        service_id,
    })
}

/// Handler: POST /upload/pdf
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/upload/pdf \
///   -F file=@guide.pdf -F service_id=5
/// ```
pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Multipart,
) -> AppResult<Response> {
    let up = read_upload(form).await?;
    SourceKind::require(&up.filename, SourceKind::Pdf)?;

    let size = up.bytes.len();
    let receipt = state.ingestor.ingest_pdf(up.bytes, up.service_id).await?;

    info!(
        request_id = %request_id(&headers),
        filename = %up.filename,
        size,
        document_id = receipt.document_id,
        "upload_pdf: stored"
    );
    Ok(ok(IngestResponse::new(receipt, "PDF uploaded successfully")))
}

/// Handler: POST /upload/text
pub async fn upload_text(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Multipart,
) -> AppResult<Response> {
    let up = read_upload(form).await?;
    SourceKind::require(&up.filename, SourceKind::Text)?;

    let receipt = state
        .ingestor
        .ingest_uploaded_text(up.bytes, up.service_id)
        .await?;

    info!(
        request_id = %request_id(&headers),
        filename = %up.filename,
        document_id = receipt.document_id,
        "upload_text: stored"
    );
    Ok(ok(IngestResponse::new(receipt, "Text file uploaded successfully")))
}
