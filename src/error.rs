// API error taxonomy. Every variant renders as `{"error": <message>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid action")]
    InvalidAction,
    /// Malformed request body; carries the parser's message.
    #[error("{0}")]
    BadRequest(String),
    #[error("container runtime unavailable")]
    RuntimeUnavailable,
    /// The runtime rejected a lifecycle call.
    #[error("{0}")]
    Runtime(String),
    #[error("{0}")]
    Collection(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAction | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RuntimeUnavailable | ApiError::Runtime(_) | ApiError::Collection(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<crate::models::InvalidAction> for ApiError {
    fn from(_: crate::models::InvalidAction) -> Self {
        ApiError::InvalidAction
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
