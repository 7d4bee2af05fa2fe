//! In-Memory Repository
//!
//! Backs tests and local runs without a database. Each operation holds the
//! write lock for its whole check-and-mutate step, which gives the same
//! atomicity as the single-statement SQL in the PostgreSQL store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{purchase_record::PurchaseRecord, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{session_token::SessionToken, user_name::UserName};
use crate::error::{AuthError, AuthResult, UniqueField};

/// In-memory user store
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::DuplicateKey(UniqueField::Username));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateKey(UniqueField::Email));
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn append_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        user.tokens.push(token.clone());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;

        let before = user.tokens.len();
        user.tokens.retain(|t| t != token);
        let removed = user.tokens.len() != before;
        if removed {
            user.updated_at = Utc::now();
        }
        Ok(removed)
    }

    async fn append_purchase(
        &self,
        user_id: &UserId,
        record: &PurchaseRecord,
    ) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        user.purchase_records.push(record.clone());
        user.updated_at = Utc::now();
        Ok(())
    }
}
