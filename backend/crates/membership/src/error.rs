//! Membership Error Types
//!
//! Membership-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Like the auth flows, every failure is
//! shown to the visitor as a flash message on a redirect.

use auth::AuthError;
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

/// Membership-specific result type alias
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Text shown for every failure the visitor cannot fix
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Membership-specific error variants
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Plan code not in the catalog
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    /// `POST /purchase` without a plan chosen on `/buy`
    #[error("Please choose a plan first.")]
    NoPlanSelected,

    /// Missing or malformed form field
    #[error("{0}")]
    Validation(String),

    /// Failure inside the member store
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Operator mail could not be sent
    #[error("Mail delivery failed: {0}")]
    Mail(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MembershipError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MembershipError::UnknownPlan(_)
            | MembershipError::NoPlanSelected
            | MembershipError::Validation(_) => ErrorKind::BadRequest,
            MembershipError::Auth(e) => e.kind(),
            MembershipError::Mail(_) => ErrorKind::ServiceUnavailable,
            MembershipError::Database(e) => classify_sqlx(e).0,
            MembershipError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text for the flash message shown after the redirect
    pub fn flash_message(&self) -> String {
        match self {
            MembershipError::Auth(e) => e.flash_message(),
            MembershipError::Mail(_) | MembershipError::Internal(_) => GENERIC_FAILURE.to_string(),
            MembershipError::Database(e) => classify_sqlx(e).1.to_string(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            MembershipError::Auth(e) => e.log(),
            MembershipError::Database(e) => {
                tracing::error!(error = %e, kind = %self.kind(), "Membership database error");
            }
            MembershipError::Mail(msg) => {
                tracing::error!(message = %msg, "Feedback mail failed");
            }
            MembershipError::Internal(msg) => {
                tracing::error!(message = %msg, "Membership internal error");
            }
            MembershipError::UnknownPlan(plan) => {
                tracing::warn!(plan = %plan, "Unknown plan requested");
            }
            _ => {
                tracing::debug!(error = %self, "Membership error");
            }
        }
    }
}

impl From<AppError> for MembershipError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            MembershipError::Internal(err.to_string())
        } else {
            MembershipError::Validation(err.user_message())
        }
    }
}
