//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sentiment_core::error::SentimentError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// Status code of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

/// Every pipeline failure, cancellation included, is a 500 with an opaque
/// message. The detail only goes to the log.
impl From<SentimentError> for ApiError {
    fn from(err: SentimentError) -> Self {
        match &err {
            SentimentError::Cancelled => {
                tracing::warn!("Request cancelled");
            }
            e if e.is_request_fatal() => {
                tracing::error!(error = %err, "Request failed");
            }
            _ => {
                // Cache and config errors are absorbed below the handler
                tracing::error!(error = %err, "Unexpected error reached the API layer");
            }
        }
        ApiError::internal("Internal error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_errors_are_opaque() {
        for err in [
            SentimentError::Cancelled,
            SentimentError::Provider("secret upstream detail".into()),
            SentimentError::ProviderTimeout { timeout_ms: 1000 },
            SentimentError::Decode("corrupt".into()),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api.message, "Internal error");
            assert_eq!(api.code, "INTERNAL_ERROR");
        }
    }

    #[test]
    fn test_bad_request() {
        let err = ApiError::bad_request("Malformed request body");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
