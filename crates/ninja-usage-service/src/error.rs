//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ninja_usage_core::BillingError;
use ninja_usage_store::StoreError;

use crate::identity::IdentityError;

/// Body text for every internal failure; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body text for a request without a resolvable identity.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Body text for a JSON body that does not match the request type.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - the event was already recorded.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request body exceeds the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,

    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ),
            Self::Timeout => (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEvent { event_id } => {
                Self::Conflict(format!("Event {event_id} already recorded"))
            }
            StoreError::Database(_) | StoreError::Unavailable(_) | StoreError::Corrupt(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::PayloadTooLarge;
        }
        tracing::debug!(reason = %rejection.body_text(), "Request body rejected");
        Self::BadRequest(INVALID_BODY_MESSAGE.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(reason) => {
                tracing::debug!(reason = %reason, "Token rejected");
                Self::Unauthorized
            }
            IdentityError::Unavailable(_) | IdentityError::Tier(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidKind(_)
            | BillingError::InvalidScore { .. }
            | BillingError::InvalidId(_) => Self::BadRequest(err.to_string()),
            BillingError::UnknownTier { .. } | BillingError::InvalidPeriod(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
