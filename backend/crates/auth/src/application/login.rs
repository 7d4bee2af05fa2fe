//! Login Use Case
//!
//! Verifies credentials and opens an additional session. Existing sessions
//! of the same member (other devices) stay valid.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::IssuedToken;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input (form fields as submitted)
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub session: IssuedToken,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Unknown user names and wrong passwords are indistinguishable:
    /// both fail with `InvalidCredentials`.
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let Ok(user_name) = UserName::new(&input.user_name) else {
            return Err(AuthError::InvalidCredentials);
        };
        let Ok(password) = RawPassword::new(input.password) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some(mut user) = self.repo.find_by_user_name(&user_name).await? else {
            warn!(user_name = %user_name, "Login for unknown user name");
            return Err(AuthError::InvalidCredentials);
        };

        let stored = user.password.clone();
        let pepper = self.config.password_pepper.clone();
        let verified =
            tokio::task::spawn_blocking(move || stored.verify(&password, pepper.as_deref()))
                .await?;
        if !verified {
            warn!(user_id = %user.user_id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.config.token_issuer().issue(&user.user_id);
        self.repo.append_token(&user.user_id, &session.token).await?;
        user.tokens.push(session.token.clone());

        info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            active_sessions = user.tokens.len(),
            "Member logged in"
        );

        Ok(LoginOutput { user, session })
    }
}
