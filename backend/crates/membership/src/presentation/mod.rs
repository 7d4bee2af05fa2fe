//! Presentation Layer
//!
//! HTTP handlers, page bodies and routing.

pub mod dto;
pub mod handlers;
pub mod router;
pub mod views;

pub use handlers::MembershipAppState;
pub use router::{membership_router, membership_router_generic};
