// src/error.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classification shared by every remote-call boundary.
///
/// Callers branch on this instead of comparing message strings: forced
/// re-auth for `Unauthorized`, onboarding redirect for
/// `NeedsCompleteRegistration`, offline screen for `Network`, toast for the
/// rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NeedsCompleteRegistration,
    Validation,
    Network,
    Unknown,
}

/// Typed failure carrier raised by every client in this crate.
///
/// `status` is the HTTP status that produced the error, or `0` for failures
/// below the HTTP layer (no configured backend, transport errors).
/// Immutable once constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(401, ErrorCode::Unauthorized, message)
    }

    pub fn validation(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, ErrorCode::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(0, ErrorCode::Network, message)
    }

    pub fn unknown(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, ErrorCode::Unknown, message)
    }

    pub fn needs_complete_registration(status: u16, message: impl Into<String>) -> Self {
        Self::new(status, ErrorCode::NeedsCompleteRegistration, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = ApiError::unknown(500, "Invalid course response");
        assert_eq!(err.to_string(), "Invalid course response");
        assert_eq!(err.status, 500);
        assert_eq!(err.code, ErrorCode::Unknown);
    }

    #[test]
    fn network_errors_use_status_zero() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.status, 0);
        assert_eq!(err.code, ErrorCode::Network);
    }
}
