//! POST /queue/book: reserves a queue ticket.

use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap, response::Response};
use queue_booking::BookingRequest;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ok},
    error_handler::AppResult,
    routes::request_id,
};

/// Handler: POST /queue/book
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/queue/book \
///   -H 'content-type: application/json' \
///   -d '{"citizen_name":"สมชาย","citizen_phone":"0812345678","service_id":5,
///        "booking_date":"2025-06-09","booking_time":"09:30:00"}'
/// ```
pub async fn book_queue(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BookingRequest>,
) -> AppResult<Response> {
    let receipt = state.queue.book(&body).await?;
    info!(
        request_id = %request_id(&headers),
        queue_number = %receipt.queue_number,
        "book_queue: booked"
    );
    Ok(ok(receipt))
}
