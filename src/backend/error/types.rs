/**
 * Backend Error Types
 *
 * `AuthError` is the taxonomy of the credential core. Every failure a caller
 * may need to branch on is its own variant; nothing is decided by matching
 * message text.
 *
 * `BackendError` is what handlers return. It wraps `AuthError`, input
 * validation failures and ad-hoc handler errors, and knows which HTTP status
 * each one maps to.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Message returned for every credential or token rejection
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// Failures of the credential verification and token lifecycle core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong password, or unknown email once collapsed by the login path
    #[error("invalid credentials")]
    InvalidCredential,

    /// Malformed token or signature mismatch
    #[error("invalid token")]
    InvalidToken,

    /// Signature is valid but the embedded expiry has passed
    #[error("token expired")]
    TokenExpired,

    /// Referenced principal does not exist
    #[error("principal not found")]
    NotFound,

    /// A principal with this email (or a role with this name) already exists
    #[error("already exists")]
    Conflict,

    /// Registration referenced a role that does not exist
    #[error("unknown role: {0}")]
    UnknownRole(i32),

    /// Hashing, signing or store failure unrelated to the credential itself
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic detail, logged but never sent to clients
        message: String,
    },
}

impl AuthError {
    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this failure is reported to clients as a plain 401
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential | Self::InvalidToken | Self::TokenExpired | Self::NotFound
        )
    }
}

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Credential core failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Handler error (e.g., missing headers, unknown resource)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Input validation failure
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// - Credential and token rejections - 401
    /// - `Conflict` - 409
    /// - `UnknownRole` and validation errors - 400
    /// - Internal and serialization errors - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(err) if err.is_unauthorized() => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::Conflict) => StatusCode::CONFLICT,
            Self::Auth(AuthError::UnknownRole(_)) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::Auth(err) if err.is_unauthorized() => UNAUTHORIZED_MESSAGE.to_string(),
            Self::Auth(AuthError::Internal { .. }) | Self::SerializationError(_) => {
                "internal server error".to_string()
            }
            Self::Auth(err) => err.to_string(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}
