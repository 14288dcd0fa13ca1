//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are indistinguishable.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Token is malformed, tampered, expired, missing `sub`, or names a user
    /// that no longer exists.
    #[error("Could not validate credentials")]
    InvalidToken,

    /// Username already taken at registration.
    #[error("Username already registered")]
    UserAlreadyExists,

    /// Password hashing failed or the blocking task was cancelled.
    #[error("password hashing error")]
    PasswordHash,

    /// Token could not be signed.
    #[error("token signing error: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
