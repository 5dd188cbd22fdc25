use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use session::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Where a client without a loaded analysis should go: the upload page.
pub const UPLOAD_ROUTE: &str = "/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No analysis result loaded")]
    NotLoaded,

    #[error("{0}")]
    Validation(String),

    #[error("A request is already in progress")]
    Busy,

    #[error("{0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotLoaded => ApiError::NotLoaded,
            SessionError::Validation(msg) => ApiError::Validation(msg),
            SessionError::Busy => ApiError::Busy,
            SessionError::Transport { message, source } => {
                tracing::error!(error = %source, "upstream request failed");
                ApiError::Upstream(message)
            }
            SessionError::Storage(e) => ApiError::Storage(e.to_string()),
            SessionError::Serialization(e) => ApiError::JsonError(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotLoaded => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Busy => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            ApiError::NotLoaded => json!({
                "error": self.to_string(),
                "redirect": UPLOAD_ROUTE,
            }),
            _ => json!({
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
