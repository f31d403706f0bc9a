//! Mapping of domain failures onto HTTP responses.
//!
//! Body shape: `{"error": <code>, "message": <text>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use kyoka_core::KyokaError;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    Invalid,
    InvalidId,
    NotFound,
    Exception,
    Timeout,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorCode,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Domain(KyokaError),
    /// Request body or query string could not be decoded
    BadRequest(String),
    /// A store call exceeded the configured limit
    Timeout(Duration),
}

impl From<KyokaError> for ApiError {
    fn from(err: KyokaError) -> Self {
        ApiError::Domain(err)
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            ApiError::Domain(KyokaError::Validation { .. }) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::Invalid)
            }
            ApiError::Domain(KyokaError::InvalidId(_)) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidId)
            }
            ApiError::Domain(KyokaError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, ErrorCode::NotFound)
            }
            ApiError::Domain(KyokaError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Exception)
            }
            ApiError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, ErrorCode::Timeout),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Timeout(limit) => {
                format!("Store did not respond within {} ms", limit.as_millis())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        match code {
            ErrorCode::Exception => tracing::error!("{}", message),
            ErrorCode::Timeout => tracing::warn!("{}", message),
            _ => tracing::debug!(status = status.as_u16(), "{}", message),
        }

        (status, Json(ErrorBody { error: code, message })).into_response()
    }
}
