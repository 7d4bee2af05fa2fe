//! Entity Module

pub mod purchase_record;
pub mod user;

pub use purchase_record::PurchaseRecord;
pub use user::{CurrentUser, User};
