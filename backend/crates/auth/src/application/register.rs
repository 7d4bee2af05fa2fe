//! Register Use Case
//!
//! Creates a member and opens their first session.

use std::sync::Arc;

use tracing::info;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::IssuedToken;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input (form fields as submitted)
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub session: IssuedToken,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // 1. Password and confirmation must agree before anything else
        let password = RawPassword::new(input.password)?;
        let confirmed = RawPassword::new(input.confirm_password)
            .map(|confirm| password.matches(&confirm))
            .unwrap_or(false);
        if !confirmed {
            return Err(AuthError::PasswordMismatch);
        }

        // 2. Validate identity fields
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(&input.email)?;

        // 3. Hash off the async workers
        let pepper = self.config.password_pepper.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            UserPassword::from_raw(&password, pepper.as_deref())
        })
        .await??;

        // 4. Persist (uniqueness is enforced by the store)
        let mut user = User::new(user_name, email, password_hash);
        self.repo.create(&user).await?;

        // 5. Open the first session
        let session = self.config.token_issuer().issue(&user.user_id);
        self.repo.append_token(&user.user_id, &session.token).await?;
        user.tokens.push(session.token.clone());

        info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "New member registered"
        );

        Ok(RegisterOutput { user, session })
    }
}
