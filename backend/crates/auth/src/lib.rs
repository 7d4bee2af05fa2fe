//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token issuer, repository traits
//! - `application/` - Use cases (register, login, logout, check session)
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, forms, router, session middleware
//!
//! ## Features
//! - Member registration and login with username + password
//! - Several concurrent sessions per member (one token per device)
//! - Logout revokes exactly the presenting session
//! - Session resolution for every request, `require_auth` for member routes
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking pool
//! - Session tokens signed with HMAC-SHA256, valid for 24 hours
//! - A token also has to be on the member's allow-list, so logout takes
//!   effect immediately even though the signature would still verify

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{RejectReason, SessionState};
pub use domain::entity::{CurrentUser, PurchaseRecord, User};
pub use domain::repository::UserRepository;
pub use error::{AuthError, AuthResult, UniqueField};
pub use infra::{InMemoryUserRepository, PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic, with_session_resolution};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryUserRepository as MemoryStore;
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
