//! User Entity
//!
//! A registered gym member together with their active session tokens and
//! purchase history.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::purchase_record::PurchaseRecord;
use crate::domain::value_object::{
    email::Email, session_token::SessionToken, user_name::UserName, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, carried inside session tokens
    pub user_id: UserId,
    /// Unique login handle
    pub user_name: UserName,
    /// Unique contact address
    pub email: Email,
    /// Argon2id hash; never clear text
    pub password: UserPassword,
    /// Currently valid session tokens, oldest first
    pub tokens: Vec<SessionToken>,
    /// Completed purchases, oldest first
    pub purchase_records: Vec<PurchaseRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh member with no sessions and no purchases
    pub fn new(user_name: UserName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password,
            tokens: Vec::new(),
            purchase_records: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `token` is on this member's allow-list
    pub fn has_token(&self, token: &SessionToken) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Identity attached to an authenticated request
    pub fn to_current_user(&self, token: SessionToken) -> CurrentUser {
        CurrentUser {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            token,
        }
    }
}

/// The member behind an authenticated request
///
/// Carries the raw token that authenticated the request so that logout can
/// revoke exactly that session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub token: SessionToken,
}
