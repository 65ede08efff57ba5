use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cinevault_core::error::CoreError;
use serde_json::json;

/// Everything a handler can fail with, flattened onto one JSON error shape.
///
/// Domain failures arrive via [`CoreError`] and storage failures via
/// [`sqlx::Error`]; the remaining variants are raised directly by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// The request itself is malformed (missing field, bad encoding).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The image host misbehaved; the detail is safe to forward.
    #[error("upstream: {0}")]
    BadGateway(String),

    /// Rejected because configuration turns the feature off.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Anything whose cause should stay out of the response body.
    #[error("internal: {0}")]
    InternalError(String),
}

/// Handler return alias.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Status, machine code, and client-visible message for this error.
    ///
    /// 5xx messages are replaced with a fixed string; the original detail
    /// only reaches the log.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                tracing::error!(error = %msg, "core failure");
                internal()
            }
            AppError::Database(err) => db_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::BadGateway(msg) => {
                tracing::warn!(error = %msg, "image host failure");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "unhandled failure");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

/// The sanitized 500 triple. Callers log the real cause before using it.
fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Sorts sqlx failures into client-facing categories.
///
/// A lookup that found nothing becomes 404. A Postgres 23505 on one of the
/// schema's `uq_`-named constraints becomes 409, since those guard
/// caller-visible uniqueness (tmdb_id). Every other driver error is logged
/// and sanitized.
fn db_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some(constraint) if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "database failure");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "database failure");
            internal()
        }
    }
}
