//! Error handling for the bookshelf HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application error types that map to HTTP responses
///
/// Validation failures render as `{"errors": [...]}`; every other variant
/// renders its message as a bare JSON string.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>, message: impl Into<String>) -> Self {
        Self::Validation {
            details,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create an internal error whose message is returned to the client verbatim
    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::Internal(anyhow::anyhow!("{message}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let (error_code, body) = match self {
            AppError::Validation {
                details,
                code,
                message,
            } => {
                tracing::debug!(error_id = %error_id, %message, fields = details.len(), "validation failed");
                (code, json!({ "errors": details }))
            }
            AppError::NotFound { message, code } => (code, json!(message)),
            AppError::BadRequest { message, code } => (code, json!(message)),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");
                ("internal_error".to_string(), json!(e.to_string()))
            }
        };

        tracing::error!(
            error_id = %error_id,
            error_code = %error_code,
            status_code = %status.as_u16(),
            "Request error"
        );

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error() {
        let details = vec![serde_json::json!({"path": "title", "msg": "Invalid value"})];
        let error = AppError::validation(details.clone(), "Validation failed");

        match error {
            AppError::Validation {
                details: d,
                code,
                message,
            } => {
                assert_eq!(d, details);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "Validation failed");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_validation_response_lists_errors() {
        let details = vec![serde_json::json!({"path": "title", "msg": "Invalid value"})];
        let response = AppError::validation(details, "invalid book").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"errors": [{"path": "title", "msg": "Invalid value"}]})
        );
    }

    #[tokio::test]
    async fn test_not_found_body_is_message_string() {
        let response = AppError::not_found("Book not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!("Book not found"));
    }

    #[tokio::test]
    async fn test_internal_error_message_is_passed_through() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let response = AppError::Internal(internal_error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!("Database connection failed")
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            AppError::bad_request("invalid id").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("boom").to_string(),
            "boom".to_string()
        );
    }
}
