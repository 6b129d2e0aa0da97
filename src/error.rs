use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// StoreError
///
/// Failure of a single document-store operation. Operations are
/// single-attempt: there is no retry and no partial-failure reconciliation,
/// so a store error simply surfaces to the handler that issued the call.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Returned by the failing in-memory doubles used in tests.
    #[error("store unavailable: {0}")]
    Unavailable(&'static str),
}

/// AppError
///
/// The application's complete error taxonomy. Every failure is surfaced
/// synchronously to the caller as an HTTP status code; deletes and reorders
/// of unknown identifiers are not errors and never reach this type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or incorrect shared secret on a protected endpoint.
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown image identifier.
    #[error("not found")]
    NotFound,

    /// Malformed multipart upload (unreadable body or missing `image` field).
    /// Malformed JSON bodies are rejected by the Json extractor before a
    /// handler runs and do not pass through here.
    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            // The body must be exactly "Unauthorized": the SPA matches on it.
            AppError::Unauthorized => {
                return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(ref e) => {
                tracing::error!("store operation failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        status.into_response()
    }
}
