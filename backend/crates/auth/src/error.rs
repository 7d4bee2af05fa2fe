//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every flow failure
//! ends up as a flash message on a redirect, so besides a classification
//! each variant knows the text shown to the visitor.

use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Unique columns of the user record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
        }
    }

    /// Resolve the field from a unique constraint name such as `users_email_key`
    pub fn from_constraint(constraint: &str) -> Option<Self> {
        if constraint.contains("username") {
            Some(UniqueField::Username)
        } else if constraint.contains("email") {
            Some(UniqueField::Email)
        } else {
            None
        }
    }
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password and confirmation differ
    #[error("Password Does Not Match!")]
    PasswordMismatch,

    /// Malformed username, email or password
    #[error("{0}")]
    Validation(String),

    /// Username or email already registered
    #[error("{} already in use. Please try with different one.", .0.as_str().to_uppercase())]
    DuplicateKey(UniqueField),

    /// Unknown username or wrong password
    #[error("Invalid Login Credentials.")]
    InvalidCredentials,

    /// No authenticated session
    #[error("Please login.")]
    Unauthenticated,

    /// User record vanished
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::PasswordMismatch | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::DuplicateKey(_) => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text for the flash message shown after the redirect
    ///
    /// Server-side failures never leak their details to the visitor.
    pub fn flash_message(&self) -> String {
        match self {
            AuthError::Database(e) => classify_sqlx(e).1.to_string(),
            AuthError::Internal(_) => "Something went wrong. Please try again later.".to_string(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, kind = %self.kind(), "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::DuplicateKey(field) => {
                tracing::info!(field = %field, "Registration rejected: duplicate key");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err.user_message())
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("blocking task failed: {err}"))
    }
}
