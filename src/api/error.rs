//! API error handling.
//!
//! Every failure is rendered as `{"success": false, "error": "<message>"}`
//! with a status chosen by the failure's class.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use super::auth::cleared_session_cookie;
use crate::service::ServiceError;

/// Message returned for faults whose detail must stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

// =============================================================================
// Error Envelope
// =============================================================================

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Human-readable error message.
    pub error: String,
    /// Whether to expire the session cookie along with the error.
    pub clear_session: bool,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            clear_session: false,
        }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized response.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized")
    }

    /// Creates a 403 Forbidden response for routes that require no session.
    #[must_use]
    pub fn already_authenticated() -> Self {
        Self::new(StatusCode::FORBIDDEN, "already authenticated")
    }

    /// Creates a 500 Internal Server Error response with the generic message.
    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    /// Marks the response to expire the session cookie.
    #[must_use]
    pub const fn clearing_session(mut self) -> Self {
        self.clear_session = true;
        self
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(ErrorEnvelope {
            success: false,
            error: self.error,
        });

        if self.clear_session {
            let jar = CookieJar::new().add(cleared_session_cookie());
            (self.status, jar, body).into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::AlreadyExists | ServiceError::InvalidCredentials => {
                Self::bad_request(error.to_string())
            }
            // Failures inside a resource service surface as downstream faults.
            ServiceError::NotFound(_) | ServiceError::InvalidIdentifier(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
            }
            ServiceError::Store(_) | ServiceError::Hashing(_) => {
                tracing::error!(%error, "Internal error");
                Self::internal_error()
            }
        }
    }
}

impl From<ValidationErrors> for ApiErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        Self::bad_request(format!("validation error: {errors}"))
    }
}

// =============================================================================
// Tests
// =============================================================================
