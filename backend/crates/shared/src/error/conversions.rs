//! Error conversions - classification of infrastructure errors
//!
//! Maps driver errors onto an [`ErrorKind`](super::kind::ErrorKind) plus a message that is safe to
//! show in a flash notification.

#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// SQLSTATE for `unique_violation`
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// Classify a database error without consuming it
///
/// Returns the error kind and a message that is safe to show to users.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => (
            ErrorKind::ServiceUnavailable,
            "Database connection pool exhausted",
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL specific error codes
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => (ErrorKind::Conflict, "Duplicate key value"),
                Some("23502") => (ErrorKind::BadRequest, "Required field is null"),
                Some("23514") => (ErrorKind::BadRequest, "Check constraint violation"),
                // Class 53: insufficient resources, class 57: operator intervention
                Some(code) if code.starts_with("53") || code.starts_with("57") => {
                    (ErrorKind::ServiceUnavailable, "Database unavailable")
                }
                _ => (ErrorKind::InternalServerError, "Database error"),
            }
        }
        sqlx::Error::Io(_) => (ErrorKind::ServiceUnavailable, "Database connection error"),
        _ => (ErrorKind::InternalServerError, "Database error"),
    }
}
