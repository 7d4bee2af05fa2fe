//! Domain Layer
//!
//! Contains entities, value objects, the token service and repository
//! traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{CurrentUser, PurchaseRecord, User};
pub use repository::{LocalUserRepository, UserRepository};
pub use service::{InvalidToken, IssuedToken, TokenClaims, TokenIssuer};
