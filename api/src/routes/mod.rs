use axum::http::HeaderMap;

use crate::middleware_layer::json_extractor::REQUEST_ID_HEADER;

pub mod documents;
pub mod query;
pub mod queue;
pub mod search;
pub mod service_info_route;

/// Request id set by the json middleware, `-` when absent.
pub(crate) fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}
