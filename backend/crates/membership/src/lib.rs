//! Membership Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Plan catalog, contact entity, store and mailer traits
//! - `application/` - Use cases (feedback, plan selection, purchase)
//! - `infra/` - PostgreSQL and in-memory stores, mailers (SMTP behind the
//!   `smtp` feature)
//! - `presentation/` - HTTP handlers, page bodies, router
//!
//! ## Features
//! - Public pages: home, about, plan overview, 404
//! - Contact feedback stored and forwarded to the operator
//! - Plan selection and purchase for logged-in members
//!
//! ## Purchase Model
//! - Prices come from the catalog; a price in the query string is ignored
//! - The chosen plan lives in the visitor's own cookie, never in shared state
//! - Purchases are appended atomically to the member record owned by `auth`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::MembershipConfig;
pub use domain::{Contact, FeedbackMail, Plan, PurchaseDetails};
pub use domain::{ContactRepository, Mailer};
pub use error::{MembershipError, MembershipResult};
pub use infra::{
    InMemoryContactRepository, LogMailer, OperatorMailer, PgContactRepository, RecordingMailer,
};
#[cfg(feature = "smtp")]
pub use infra::SmtpMailer;
pub use presentation::router::{membership_router, membership_router_generic};

// Convenience re-exports
pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
