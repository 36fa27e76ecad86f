use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Machine-readable error codes sent in every error body.
///
/// HTTP clients key off `code`; `message` is for humans and may change.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error returned by the likes service and its host.
///
/// Rendered as `{"code": "NOT_FOUND", "message": "like 42 not found"}` with
/// the status from [`ServiceError::status_code`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing record or unknown slug. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Rejected request input. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unreadable or incomplete configuration, catalogs included.
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    fn parts(&self) -> (StatusCode, &'static str) {
        use ServiceError::*;
        match self {
            NotFound(_) => (StatusCode::NOT_FOUND, error_code::NOT_FOUND),
            Validation(_) => (StatusCode::BAD_REQUEST, error_code::VALIDATION_FAILED),
            Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_code::STORAGE_ERROR),
            Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_code::CONFIG_ERROR),
            Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, error_code::INTERNAL),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = serde_json::json!({
            "code": code,
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
