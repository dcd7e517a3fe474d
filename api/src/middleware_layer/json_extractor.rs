//! Request-id propagation and enveloping of extractor rejections.
//!
//! axum rejects malformed JSON, query strings and multipart bodies with a
//! plain-text 4xx. Those are rewritten into the JSON error envelope; JSON
//! responses produced by handlers pass through untouched.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::debug;

use crate::{
    core::http::response_envelope::{ApiErrorDetail, ApiResponse},
    error_handler::AppError,
};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

async fn take_body(res: Response) -> Result<(axum::http::response::Parts, Bytes), AppError> {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| AppError::BadRequest(format!("failed to read rejection body: {e}")))?;
    Ok((parts, bytes))
}

/// Extracts the offending field from serde messages such as
/// "missing field `service_id`" or "unknown field `foo`".
fn field_from_serde_msg(msg: &str) -> Option<String> {
    let start = msg.find('`')? + 1;
    let len = msg[start..].find('`')?;
    Some(msg[start..start + len].to_string())
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("Add the missing field to the request body.".into())
    } else if msg.contains("invalid type") {
        Some("Check the field types, e.g. service_id must be an integer.".into())
    } else if msg.contains("Content-Type") || msg.contains("multipart") {
        Some("Send a multipart/form-data body with `file` and `service_id` parts.".into())
    } else {
        None
    }
}

/// Returns the caller's `X-Request-Id` or a fresh time-based one.
fn request_id(headers: &HeaderMap) -> HeaderValue {
    if let Some(v) = headers.get(REQUEST_ID_HEADER) {
        if v.to_str().is_ok_and(|s| !s.trim().is_empty()) {
            return v.clone();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    HeaderValue::from_str(&format!("req-{nanos}")).unwrap_or(HeaderValue::from_static("req-0"))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

pub async fn json_error_mapper(mut req: Request<Body>, next: Next) -> Response {
    let id = request_id(req.headers());
    req.headers_mut().insert(REQUEST_ID_HEADER, id.clone());

    let res = next.run(req).await;
    let status = res.status();

    if !status.is_client_error() || is_json(res.headers()) {
        let mut res = res;
        res.headers_mut().insert(REQUEST_ID_HEADER, id);
        return res;
    }

    let (mut parts, bytes) = match take_body(res).await {
        Ok(v) => v,
        Err(e) => {
            let mut res = e.into_response();
            res.headers_mut().insert(REQUEST_ID_HEADER, id);
            return res;
        }
    };
    let original = String::from_utf8_lossy(&bytes);
    debug!(request_id = ?id, %status, body = %original, "enveloping rejection");

    let code = match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        _ => "BAD_REQUEST",
    };
    let details = match (field_from_serde_msg(&original), hint_for(&original)) {
        (None, None) => Vec::new(),
        (field, hint) => vec![ApiErrorDetail { field, hint }],
    };
    let message = match original.trim() {
        "" => status.canonical_reason().unwrap_or("request rejected"),
        m => m,
    };
    let envelope = ApiResponse::<()>::error(code, message, details);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(REQUEST_ID_HEADER, id);

    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_read_from_backticks() {
        assert_eq!(
            field_from_serde_msg("Failed to deserialize: missing field `service_id` at line 1"),
            Some("service_id".into())
        );
        assert_eq!(field_from_serde_msg("EOF while parsing"), None);
    }

    #[tokio::test]
    async fn unreadable_body_becomes_bad_request() {
        let chunks = vec![Err::<Bytes, std::io::Error>(std::io::Error::other("reset"))];
        let res = Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Body::from_stream(futures::stream::iter(chunks)))
            .unwrap();

        let err = take_body(res).await.unwrap_err();
        assert!(matches!(&err, AppError::BadRequest(m) if m.contains("reset")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn caller_request_id_is_kept() {
        let mut h = HeaderMap::new();
        h.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-1"));
        assert_eq!(request_id(&h), "abc-1");

        let fresh = request_id(&HeaderMap::new());
        assert!(fresh.to_str().unwrap().starts_with("req-"));
    }
}
