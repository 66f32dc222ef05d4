use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use content_sync::SyncError;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Body(#[from] BytesRejection),

    #[error("Failed to create backup.")]
    Backup(#[source] SyncError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": self.to_string() }),
            ),
            AppError::Body(rejection) => (
                rejection.status(),
                json!({ "error": rejection.body_text() }),
            ),
            AppError::Backup(e) => {
                tracing::error!("Backup failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string(), "details": e.to_string() }),
                )
            }
            AppError::Sync(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() }))
            }
            AppError::Sync(e) => {
                tracing::error!("Request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
