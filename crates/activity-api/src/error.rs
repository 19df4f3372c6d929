use activity_core::ErrorEnvelope;
use activity_crypto::CryptoError;
use activity_ingest::IngestError;
use activity_refresh::RefreshError;
use activity_store::{DirectoryError, StoreError};
use activity_timeline::TimelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// HTTP-facing error type. Every handler returns
/// `Result<_, AppError>`; `IntoResponse` renders the standard envelope.
#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Conflict(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    fn label(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::BadRequest(_) => "Bad request",
            AppError::Conflict(_) => "Conflict",
            AppError::NotFound(_) => "Not found",
            AppError::Internal(_) => "Internal server error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The human message carried in the envelope. 5xx messages stay
    /// generic so the response never leaks internals; the real cause is
    /// still logged by the caller.
    fn message(&self) -> String {
        match self {
            AppError::Internal(_) => "internal server error".to_string(),
            AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::BadRequest(m)
            | AppError::Conflict(m)
            | AppError::NotFound(m) => m.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let envelope = ErrorEnvelope::new(self.label(), self.message());
        (self.status(), Json(envelope)).into_response()
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(what) => AppError::NotFound(format!("resource not found: {what}")),
            DirectoryError::Conflict(msg) => AppError::Conflict(msg),
            DirectoryError::Backend(err) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(format!("resource not found: {what}")),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<TimelineError> for AppError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::Store(e) => e.into(),
            TimelineError::Directory(e) => e.into(),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::NotFound(what) => AppError::NotFound(format!("resource not found: {what}")),
            RefreshError::Inactive(what) => AppError::BadRequest(format!("account is inactive: {what}")),
            RefreshError::Directory(e) => e.into(),
            RefreshError::Ingest(e) => e.into(),
            RefreshError::Timeline(e) => e.into(),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        AppError::Internal(err.to_string())
    }
}
