//! Unified error handling
//!
//! Provides the application error type and its HTTP mapping:
//! - [`AppError`] - application error enum
//! - [`AppResult`] - handler result alias
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | General | E0003 not found |
//! | E1xxx | Authentication | E1001 not logged in |
//! | E4xxx | Cart / order | E4001 empty cart |
//! | E9xxx | System | E9002 storage error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::response::ApiResponse;

/// Application error enum
#[derive(Debug, Error)]
pub enum AppError {
    // ========== Authentication errors ==========
    /// Operation requires a current identity (401)
    #[error("Authentication required")]
    Unauthenticated,

    /// Login failed; uniform for unknown email and wrong password (401)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Current identity lacks the required role (403)
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ========== Business errors ==========
    /// Checkout attempted with zero line items (422)
    #[error("Cart is empty")]
    EmptyCart,

    /// Resource not found (404)
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Request payload failed validation (400)
    #[error("{message}")]
    Validation { message: String },

    // ========== System errors ==========
    /// Persisted state could not be read or written (500)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Internal server error (500)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    // ========== Convenient constructors ==========

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // ========== Inspection ==========

    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E1001",
            Self::InvalidCredentials => "E1002",
            Self::Forbidden { .. } => "E1003",
            Self::EmptyCart => "E4001",
            Self::NotFound { .. } => "E0003",
            Self::Validation { .. } => "E0002",
            Self::Storage { .. } => "E9002",
            Self::Internal { .. } => "E9001",
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Storage { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        }
        let body = ApiResponse::<()>::error(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Result type for handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::EmptyCart.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::not_found("Order").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::storage("disk full").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AppError::Unauthenticated.code(), "E1001");
        assert_eq!(AppError::EmptyCart.code(), "E4001");
        assert_eq!(AppError::validation("bad").code(), "E0002");
    }
}
