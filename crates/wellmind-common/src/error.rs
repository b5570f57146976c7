use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WellmindError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(u64),

    #[error("Result not found: {0}")]
    ResultNotFound(u64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WellmindError>;

/// Error returned by JSON API handlers. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
    }
}

impl From<WellmindError> for ApiError {
    fn from(err: WellmindError) -> Self {
        match err {
            WellmindError::EmployeeNotFound(_) | WellmindError::ResultNotFound(_) => {
                Self::not_found(err.to_string())
            }
            WellmindError::Validation(_) => Self::bad_request(err.to_string()),
            other => {
                tracing::error!("internal error: {}", other);
                Self::internal(other.to_string())
            }
        }
    }
}

/// Malformed or mistyped JSON bodies are client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = WellmindError::EmployeeNotFound(7).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Employee not found: 7");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err: ApiError = WellmindError::Validation("email is required".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid input: email is required");
    }

    #[test]
    fn test_other_maps_to_500() {
        let err: ApiError = WellmindError::Other(anyhow::anyhow!("template missing")).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "template missing");
    }
}
