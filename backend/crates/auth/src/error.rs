//! Password Reset Error Types
//!
//! This module provides reset-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

/// Reset-specific result type alias
pub type ResetResult<T> = Result<T, ResetError>;

#[derive(Debug, Error)]
pub enum ResetError {
    /// No token with this value exists
    #[error("Invalid reset token")]
    TokenInvalid,

    #[error("Reset token already used")]
    TokenAlreadyUsed,

    #[error("Reset token expired")]
    TokenExpired,

    /// New password rejected by policy
    #[error("Password rejected: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    /// Account vanished between verification and update.
    /// Never surfaced by the request flow.
    #[error("User not found")]
    UserNotFound,

    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResetError {
    /// Stable machine code rendered in error bodies
    pub fn reason(&self) -> &'static str {
        match self {
            ResetError::TokenInvalid => "INVALID",
            ResetError::TokenAlreadyUsed => "ALREADY_USED",
            ResetError::TokenExpired => "EXPIRED",
            ResetError::WeakPassword(_) => "WEAK_PASSWORD",
            ResetError::UserNotFound => "INVALID",
            ResetError::LedgerUnavailable(_) => "LEDGER_UNAVAILABLE",
            ResetError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ResetError::TokenInvalid | ResetError::WeakPassword(_) | ResetError::UserNotFound => {
                StatusCode::BAD_REQUEST
            }
            ResetError::TokenAlreadyUsed | ResetError::TokenExpired => StatusCode::GONE,
            ResetError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ResetError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResetError::TokenInvalid | ResetError::WeakPassword(_) | ResetError::UserNotFound => {
                ErrorKind::BadRequest
            }
            ResetError::TokenAlreadyUsed | ResetError::TokenExpired => ErrorKind::Gone,
            ResetError::LedgerUnavailable(_) => ErrorKind::ServiceUnavailable,
            ResetError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ResetError::LedgerUnavailable(e) => {
                tracing::error!(error = %e, "Password reset ledger error");
            }
            ResetError::Internal(msg) => {
                tracing::error!(message = %msg, "Password reset internal error");
            }
            ResetError::TokenInvalid => {
                tracing::warn!("Unknown password reset token presented");
            }
            ResetError::TokenAlreadyUsed => {
                tracing::warn!("Used password reset token presented");
            }
            _ => {
                tracing::debug!(reason = self.reason(), "Password reset rejected");
            }
        }
    }
}

impl From<ResetError> for AppError {
    fn from(err: ResetError) -> Self {
        let kind = err.kind();
        let reason = err.reason();
        let message = match &err {
            ResetError::LedgerUnavailable(_) => "Ledger unavailable".to_string(),
            ResetError::Internal(_) => "Internal error".to_string(),
            // Same wording as an unknown token
            ResetError::UserNotFound => ResetError::TokenInvalid.to_string(),
            other => other.to_string(),
        };
        AppError::new(kind, message).with_reason(reason)
    }
}

impl IntoResponse for ResetError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
