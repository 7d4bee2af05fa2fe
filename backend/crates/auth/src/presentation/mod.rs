//! Presentation Layer
//!
//! HTTP handlers, form DTOs, page bodies, router, and session middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, please_login, require_auth, resolve_session};
pub use router::{auth_router, auth_router_generic, with_session_resolution};
