//! API error types and handling
//!
//! Every failure collapses into one of these variants before leaving the
//! handler. Bodies are fixed plain-text messages; internal error text is only
//! ever logged.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use wkd_router_shared::WkdError;

use crate::proxy::UpstreamError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Server configuration error")]
    Configuration,
    #[error("Domain not supported")]
    DomainNotSupported,
    #[error("Missing local part in query parameter 'l'")]
    MissingLocalPart,
    #[error("Upstream error")]
    UpstreamStatus(StatusCode),
    #[error("Internal Server Error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DomainNotSupported => StatusCode::NOT_FOUND,
            ApiError::MissingLocalPart => StatusCode::BAD_REQUEST,
            ApiError::UpstreamStatus(status) => *status,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), self.to_string()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

impl From<WkdError> for ApiError {
    fn from(err: WkdError) -> Self {
        match err {
            WkdError::MissingLocalPart => ApiError::MissingLocalPart,
            other => {
                tracing::error!(event = "unhandled_error", message = %other, "Failed to build upstream URL");
                ApiError::Internal
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::error!(event = "unhandled_error", message = %err, "Upstream request failed");
        ApiError::Internal
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
