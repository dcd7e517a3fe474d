//! GET /: service name and version.

use axum::response::Response;
use serde::Serialize;

use crate::core::http::response_envelope::ok;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn service_info() -> Response {
    ok(ServiceInfo {
        message: "Public service document assistant with queue booking",
        version: env!("CARGO_PKG_VERSION"),
    })
}
