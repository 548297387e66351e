use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use platelens_session::SessionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`SessionError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from the session layer.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(session) => match session {
                SessionError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
                }
                SessionError::UnknownDish(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string())
                }
                SessionError::Busy { .. } => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
                SessionError::NoBaseImage { .. } => {
                    (StatusCode::CONFLICT, "NO_BASE_IMAGE", self.to_string())
                }
                // Gateway-backed failures: the upstream service broke, not
                // the client's request. The message is already sanitized
                // by the session layer.
                SessionError::Parse(_)
                | SessionError::Generation { .. }
                | SessionError::Edit { .. } => {
                    tracing::error!(error = %session, "Gateway-backed operation failed");
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", self.to_string())
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
