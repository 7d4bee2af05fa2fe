//! In-Memory Repository
//!
//! Backs tests and local runs without a database.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::contact::Contact;
use crate::domain::repository::ContactRepository;
use crate::error::MembershipResult;

/// In-memory contact store
#[derive(Clone, Debug, Default)]
pub struct InMemoryContactRepository {
    contacts: Arc<RwLock<Vec<Contact>>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored submissions, oldest first
    pub async fn all(&self) -> Vec<Contact> {
        self.contacts.read().await.clone()
    }
}

impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, contact: &Contact) -> MembershipResult<()> {
        self.contacts.write().await.push(contact.clone());
        Ok(())
    }
}
