//! Application error type mapping to HTTP status codes and the flat
//! response contract.
//!
//! Every failure leaves the relay as `{"error": "<message>"}` -- the
//! presence of the `error` key is the failure signal the chat widget
//! checks, regardless of the HTTP status code. Statuses are still set
//! semantically for well-behaved clients and logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use parley_types::error::SessionError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Session service errors.
    Session(SessionError),
    /// Malformed or incomplete request payload.
    Validation(String),
    /// Unrecognized route name in the envelope.
    InvalidRoute,
    /// Request origin failed the allow-list.
    OriginNotAllowed,
    /// Owner failed the allow-list (non-trusted origin).
    OwnerNotAllowed,
    /// Generic internal error.
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::OwnerMismatch) => StatusCode::FORBIDDEN,
            ApiError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::OwnerQuotaExceeded(_))
            | ApiError::Session(SessionError::MessageQuotaExceeded(_)) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Session(SessionError::Conflict) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::Gateway(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Session(SessionError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::InvalidRoute => StatusCode::BAD_REQUEST,
            ApiError::OriginNotAllowed | ApiError::OwnerNotAllowed => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Session(e) => e.to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::InvalidRoute => "invalid route specified".to_string(),
            ApiError::OriginNotAllowed => "origin not allowed".to_string(),
            ApiError::OwnerNotAllowed => "owner not allowed".to_string(),
            ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.message()}))).into_response()
    }
}
