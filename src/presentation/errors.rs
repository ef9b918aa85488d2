use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Error identifiers exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    RouteNotFound,
    SignupDisabled,
    EmailAlreadyInUse,
    InvalidRequest,
    InternalServerError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::SignupDisabled => StatusCode::FORBIDDEN,
            Self::EmailAlreadyInUse => StatusCode::CONFLICT,
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RouteNotFound => "route-not-found",
            Self::SignupDisabled => "signup-disabled",
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::InvalidRequest => "invalid-request",
            Self::InternalServerError => "internal-server-error",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::RouteNotFound => "Route not found",
            Self::SignupDisabled => "Sign up is disabled",
            Self::EmailAlreadyInUse => "Email already in use",
            Self::InvalidRequest => "Invalid request",
            Self::InternalServerError => "Internal server error",
        }
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(error: &DomainError) -> Self {
        match error {
            // Callers without the elevated role get the same response as a
            // missing route, so the endpoint's existence is not disclosed.
            DomainError::ElevatedRoleRequired => Self::RouteNotFound,
            DomainError::SignupDisabled => Self::SignupDisabled,
            DomainError::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            DomainError::InvalidEmail | DomainError::EmptyProfileField => Self::InvalidRequest,
            DomainError::Repository(_) => Self::InternalServerError,
        }
    }
}

/// json payload for a failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    pub error: String,
}

/// Map a named error condition to its transport-level response.
pub fn send_error(code: ErrorCode) -> Response {
    let status = code.status();
    let payload = ErrorResponse {
        status: status.as_u16(),
        message: code.message().to_string(),
        error: code.as_str().to_string(),
    };
    (status, Json(payload)).into_response()
}
