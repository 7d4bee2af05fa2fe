//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.
//!
//! Every mutation of `tokens` and `purchase_records` is a single atomic
//! operation in the store. Callers never read a record, modify it and write
//! it back, so concurrent logins or purchases by the same member cannot
//! lose each other's updates.

use kernel::id::UserId;

use crate::domain::entity::{purchase_record::PurchaseRecord, user::User};
use crate::domain::value_object::{session_token::SessionToken, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    ///
    /// Fails with `AuthError::DuplicateKey` naming the first conflicting
    /// field; username is checked before email.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by exact user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Append a session token to the user's allow-list
    async fn append_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<()>;

    /// Remove a session token; `false` if it was not present
    async fn remove_token(&self, user_id: &UserId, token: &SessionToken) -> AuthResult<bool>;

    /// Append a completed purchase to the user's history
    async fn append_purchase(&self, user_id: &UserId, record: &PurchaseRecord)
    -> AuthResult<()>;
}
