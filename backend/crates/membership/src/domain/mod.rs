//! Domain Layer
//!
//! Plan catalog, contact entity and the persistence/mail seams.

pub mod contact;
pub mod plan;
pub mod repository;

pub use contact::{Contact, ContactInput, FeedbackMail};
pub use plan::{Plan, PurchaseDetails};
pub use repository::{ContactRepository, LocalContactRepository, LocalMailer, Mailer};
