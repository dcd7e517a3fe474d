use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use directory::DirectoryError;
use queue_booking::QueueError;
use rag_store::RagError;
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("startup failed: {0}")]
    Startup(String),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / domain ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Rag(#[from] RagError),

    #[error(transparent)]
    Answer(#[from] ContextorError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Status, machine code, and whether the message may be shown to clients.
struct Mapping {
    status: StatusCode,
    code: &'static str,
    expose: bool,
}

const fn client(status: StatusCode, code: &'static str) -> Mapping {
    Mapping {
        status,
        code,
        expose: true,
    }
}

const INTERNAL: Mapping = Mapping {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    code: "INTERNAL_ERROR",
    expose: false,
};

const STORAGE: Mapping = Mapping {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    code: "STORAGE_ERROR",
    expose: false,
};

fn directory_mapping(e: &DirectoryError) -> Mapping {
    match e {
        DirectoryError::ServiceNotFound(_) => client(StatusCode::NOT_FOUND, "SERVICE_NOT_FOUND"),
        DirectoryError::Persistence(_) => STORAGE,
    }
}

fn rag_mapping(e: &RagError) -> Mapping {
    match e {
        RagError::ContentEmpty => client(StatusCode::BAD_REQUEST, "CONTENT_EMPTY"),
        RagError::Extraction(_) => client(StatusCode::BAD_REQUEST, "EXTRACTION_FAILED"),
        RagError::Encoding(_) => client(StatusCode::BAD_REQUEST, "INVALID_ENCODING"),
        RagError::UnsupportedFile { .. } => client(StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE"),
        RagError::DocumentNotFound(_) => client(StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND"),
        RagError::Directory(d) => directory_mapping(d),
        RagError::Embedding(_) | RagError::DimensionMismatch { .. } => {
            client(StatusCode::BAD_GATEWAY, "EMBEDDING_FAILED")
        }
        RagError::Persistence(_) => STORAGE,
        RagError::Config(_) => INTERNAL,
    }
}

impl AppError {
    fn mapping(&self) -> Mapping {
        match self {
            AppError::BadRequest(_) => client(StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Rag(e) => rag_mapping(e),
            AppError::Directory(e) => directory_mapping(e),
            AppError::Answer(e) => match e {
                ContextorError::EmptyQuestion => client(StatusCode::BAD_REQUEST, "EMPTY_QUESTION"),
                ContextorError::Rag(r) => rag_mapping(r),
                ContextorError::Generation(_) => {
                    client(StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
                }
            },
            AppError::Queue(e) => match e {
                QueueError::Validation(_) => client(StatusCode::BAD_REQUEST, "INVALID_BOOKING"),
                QueueError::Directory(d) => directory_mapping(d),
                QueueError::Persistence(_) => STORAGE,
                QueueError::Exhausted { .. } => Mapping {
                    code: "QUEUE_EXHAUSTED",
                    ..INTERNAL
                },
            },
            AppError::Database(_) => STORAGE,
            // startup-only
            AppError::Startup(_) | AppError::Llm(_) | AppError::Bind(_) | AppError::Server(_) => {
                INTERNAL
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let m = self.mapping();
        let message = if m.expose {
            self.to_string()
        } else {
            error!(code = m.code, error = %self, "request failed");
            "internal server error".to_string()
        };

        ApiResponse::<()>::error(m.code, message, Vec::new()).into_response_with_status(m.status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_http_status() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (RagError::ContentEmpty.into(), StatusCode::BAD_REQUEST),
            (RagError::DocumentNotFound(3).into(), StatusCode::NOT_FOUND),
            (
                RagError::Directory(DirectoryError::ServiceNotFound(9)).into(),
                StatusCode::NOT_FOUND,
            ),
            (RagError::Embedding("timeout".into()).into(), StatusCode::BAD_GATEWAY),
            (
                ContextorError::Generation("refused".into()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                QueueError::Validation("citizen_name is required".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                RagError::Persistence(sqlx::Error::PoolTimedOut).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.mapping().status, status, "{err}");
        }
    }

    #[test]
    fn upstream_messages_are_verbatim_and_storage_messages_hidden() {
        let up = AppError::from(ContextorError::Generation("model not loaded".into()));
        assert!(up.mapping().expose);
        assert!(up.to_string().contains("model not loaded"));

        let db = AppError::from(RagError::Persistence(sqlx::Error::PoolTimedOut));
        assert!(!db.mapping().expose);
    }
}
