use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Request-level failures the HTTP layer reports to callers. Upstream
/// trouble never lands here — collaborators substitute content instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The chat endpoint was called without a message.
    #[error("Message is required")]
    MissingMessage,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingMessage => StatusCode::BAD_REQUEST,
        };
        let message = self.to_string();

        tracing::error!(%status, error = %message, "request failed");
        (status, Json(json!({ "error": message }))).into_response()
    }
}
