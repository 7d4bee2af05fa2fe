//! Repository and Gateway Traits
//!
//! Interfaces for persistence and outgoing mail. Implementations are in the
//! infrastructure layer. Purchases are appended through
//! [`auth::UserRepository`], which owns the member record.

use crate::domain::contact::{Contact, FeedbackMail};
use crate::error::MembershipResult;

/// Contact repository trait
#[trait_variant::make(ContactRepository: Send)]
pub trait LocalContactRepository {
    /// Persist a feedback submission
    async fn create(&self, contact: &Contact) -> MembershipResult<()>;
}

/// Outgoing operator mail
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, mail: &FeedbackMail) -> MembershipResult<()>;
}
