//! Custom error types specific to authentication failures.
//!
//! Credential and session failures are collapsed into a small set of
//! user-facing messages; in particular "no such account" and "wrong
//! password" are indistinguishable to the caller to prevent account
//! enumeration.

use thiserror::Error;

use crate::errors::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No cookie matched the session-token pattern, or nothing verified.
    #[error("No valid authentication token found")]
    MissingToken,

    /// A verified token pointed at an account that no longer exists.
    #[error("User not found")]
    UnknownUser,

    #[error("Admin access required")]
    AdminRequired,

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::MissingToken => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::UnknownUser => ApiError::UserNotFound,
            AuthError::AdminRequired => ApiError::Forbidden(err.to_string()),
            AuthError::Token(e) => ApiError::Internal(e.to_string()),
            AuthError::Hash(e) => ApiError::Internal(e.to_string()),
        }
    }
}
