use thiserror::Error;

use crate::tracking::Platform;

// =========================================================
// Request errors
// =========================================================

/// Failure of a single API call.
///
/// Produced only by [`crate::request::ApiClient::call`]; every variant carries
/// the endpoint path it happened on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network or connection failure, the server was never heard from.
    #[error("[{path}] transport failure: {reason}")]
    Transport { path: &'static str, reason: String },
    /// Non-2xx answer. `message` is the server-provided `error` field, if any.
    #[error("[{path}] rejected with status {status}")]
    Rejected {
        path: &'static str,
        status: u16,
        message: Option<String>,
    },
    /// Body that could not be read: a 2xx answer of the wrong shape, or an
    /// error status whose body is not JSON.
    #[error("[{path}] malformed response: {reason}")]
    Decode { path: &'static str, reason: String },
}

impl ApiError {
    /// Server-provided message for rejected calls.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// Authentication failures
// =========================================================

/// Why authentication did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Bad login or registration, reported by the server.
    Credential,
    /// Network failure or an unreadable answer.
    Transport,
    /// Token validation rejected or malformed.
    TokenInvalid,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::Credential => "credential",
            AuthErrorKind::Transport => "transport",
            AuthErrorKind::TokenInvalid => "token_invalid",
        }
    }
}

/// Failure side of [`crate::AuthResult`], always displayable to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthFailure {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Credential, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Transport, message)
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::TokenInvalid, message)
    }
}

// =========================================================
// Tracking errors
// =========================================================

/// A tracking backend could not deliver. Never reaches callers of `emit`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    #[error("{0} SDK is not loaded")]
    Unavailable(Platform),
    #[error("{platform} call failed: {reason}")]
    Call { platform: Platform, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = ApiError::Rejected {
            path: "/api/auth/login",
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(
            err.to_string(),
            "[/api/auth/login] rejected with status 401"
        );

        let err = ApiError::Transport {
            path: "/api/auth/me",
            reason: "offline".into(),
        };
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_auth_failure_displays_message_only() {
        let failure = AuthFailure::credential("Invalid credentials");
        assert_eq!(failure.to_string(), "Invalid credentials");
        assert_eq!(failure.kind.as_str(), "credential");
    }
}
