//! Download Error Types
//!
//! Download-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Denials carry a stable machine reason
//! so clients can distinguish "buy it first" from "ask for a fresh link".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Download-specific result type alias
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Reason codes exposed to clients for denied requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NotPurchased,
    LimitExceeded,
    InvalidOrExpiredToken,
}

impl DenialReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DenialReason::NotPurchased => "NOT_PURCHASED",
            DenialReason::LimitExceeded => "LIMIT_EXCEEDED",
            DenialReason::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    /// No completed order contains the product
    #[error("Product not purchased")]
    NotPurchased,

    /// Download count reached the product's limit
    #[error("Download limit exceeded")]
    LimitExceeded,

    /// Signature mismatch, malformed fields or revoked link
    #[error("Invalid download token")]
    TokenInvalid,

    #[error("Download token expired")]
    TokenExpired,

    /// Request carried no authenticated principal
    #[error("Authentication required")]
    Unauthenticated,

    /// Product exists in the ledger but has no stored file
    #[error("Product file not found")]
    FileNotFound,

    /// Ledger unreachable or failing; grant and redeem fail closed
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DownloadError {
    /// Client-facing denial reason, if this error is a denial
    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            DownloadError::NotPurchased => Some(DenialReason::NotPurchased),
            DownloadError::LimitExceeded => Some(DenialReason::LimitExceeded),
            DownloadError::TokenInvalid | DownloadError::TokenExpired => {
                Some(DenialReason::InvalidOrExpiredToken)
            }
            _ => None,
        }
    }

    /// Stable machine code rendered in error bodies
    pub fn reason(&self) -> &'static str {
        if let Some(denial) = self.denial() {
            return denial.as_str();
        }
        match self {
            DownloadError::Unauthenticated => "UNAUTHENTICATED",
            DownloadError::FileNotFound => "FILE_NOT_FOUND",
            DownloadError::LedgerUnavailable(_) => "LEDGER_UNAVAILABLE",
            _ => "INTERNAL",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DownloadError::NotPurchased | DownloadError::LimitExceeded => StatusCode::FORBIDDEN,
            DownloadError::TokenInvalid => StatusCode::BAD_REQUEST,
            DownloadError::TokenExpired => StatusCode::GONE,
            DownloadError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DownloadError::FileNotFound => StatusCode::NOT_FOUND,
            DownloadError::LedgerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DownloadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::NotPurchased | DownloadError::LimitExceeded => ErrorKind::Forbidden,
            DownloadError::TokenInvalid => ErrorKind::BadRequest,
            DownloadError::TokenExpired => ErrorKind::Gone,
            DownloadError::Unauthenticated => ErrorKind::Unauthorized,
            DownloadError::FileNotFound => ErrorKind::NotFound,
            DownloadError::LedgerUnavailable(_) => ErrorKind::ServiceUnavailable,
            DownloadError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            DownloadError::LedgerUnavailable(e) => {
                tracing::error!(error = %e, "Download ledger error");
            }
            DownloadError::Internal(msg) => {
                tracing::error!(message = %msg, "Download internal error");
            }
            DownloadError::TokenInvalid => {
                tracing::warn!("Invalid download token presented");
            }
            DownloadError::FileNotFound => {
                tracing::warn!("Entitled product has no stored file");
            }
            _ => {
                tracing::debug!(reason = self.reason(), "Download denied");
            }
        }
    }
}

impl From<DownloadError> for AppError {
    fn from(err: DownloadError) -> Self {
        let kind = err.kind();
        let reason = err.reason();
        // Ledger details stay in the logs
        let message = match &err {
            DownloadError::LedgerUnavailable(_) => "Ledger unavailable".to_string(),
            DownloadError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        };
        AppError::new(kind, message).with_reason(reason)
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(DownloadError::NotPurchased.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(DownloadError::LimitExceeded.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(DownloadError::TokenInvalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(DownloadError::TokenExpired.status_code(), StatusCode::GONE);
        assert_eq!(
            DownloadError::LedgerUnavailable(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_token_errors_share_reason() {
        assert_eq!(DownloadError::TokenInvalid.reason(), "INVALID_OR_EXPIRED_TOKEN");
        assert_eq!(DownloadError::TokenExpired.reason(), "INVALID_OR_EXPIRED_TOKEN");
    }

    #[test]
    fn test_ledger_details_not_leaked() {
        let app: AppError = DownloadError::LedgerUnavailable(sqlx::Error::PoolClosed).into();
        assert_eq!(app.message(), "Ledger unavailable");
        assert_eq!(app.reason(), Some("LEDGER_UNAVAILABLE"));
        assert_eq!(app.status_code(), 503);
    }
}
