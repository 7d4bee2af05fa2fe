//! Logout Use Case
//!
//! Revokes exactly the session that made the request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entity::user::CurrentUser;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Remove the presented token from the member's allow-list
    ///
    /// Fails with `Unauthenticated` if the token was already gone (revoked
    /// by a concurrent logout).
    pub async fn execute(&self, current: &CurrentUser) -> AuthResult<()> {
        let removed = self
            .repo
            .remove_token(&current.user_id, &current.token)
            .await?;

        if !removed {
            warn!(user_id = %current.user_id, "Logout with an already revoked session");
            return Err(AuthError::Unauthenticated);
        }

        info!(
            user_id = %current.user_id,
            user_name = %current.user_name,
            "Member logged out"
        );
        Ok(())
    }
}
