//! HTTP surface of the backend.
//!
//! [`router`] builds the axum application over a prepared [`AppState`];
//! [`start`] wires everything from the environment and serves until Ctrl+C.

use std::{env, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub mod core;
mod error_handler;
mod middleware_layer;
mod routes;

pub use crate::core::app_state::AppState;
pub use error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        documents::{
            add_text_route::add_text,
            documents_route::{count_documents, delete_document, get_document, list_documents},
            upload_route::{MAX_UPLOAD_BYTES, upload_pdf, upload_text},
        },
        query::query_route::query,
        queue::book_queue_route::book_queue,
        search::suggestions_route::search_suggestions,
        service_info_route::service_info,
    },
};

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let uploads = Router::new()
        .route("/upload/pdf", post(upload_pdf))
        .route("/upload/text", post(upload_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/", get(service_info))
        .route("/add/text", post(add_text))
        .route("/query", post(query))
        .route("/documents", get(list_documents))
        .route("/documents/count", get(count_documents))
        .route("/documents/{id}", get(get_document).delete(delete_document))
        .route("/search/suggestions", get(search_suggestions))
        .route("/queue/book", post(book_queue))
        .merge(uploads)
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// CORS for the configured browser origins (`CORS_ORIGINS`, comma separated).
fn cors_layer() -> CorsLayer {
    let raw = env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = s, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Loads state from the environment, binds `API_ADDRESS` and serves.
pub async fn start() -> Result<(), AppError> {
    let address = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let state = Arc::new(AppState::from_env().await?);
    let app = router(state).layer(cors_layer());

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
