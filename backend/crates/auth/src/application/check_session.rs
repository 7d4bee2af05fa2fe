//! Check Session Use Case
//!
//! Resolves the session cookie of a request into a [`SessionState`].
//!
//! A presented token goes through two independent checks:
//! 1. signature and expiry ([`TokenIssuer::verify`], no I/O)
//! 2. allow-list: the member still exists and still lists the token
//!
//! Passing the first but failing the second means the session was revoked.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::CurrentUser;
use crate::domain::repository::UserRepository;
use crate::domain::service::{InvalidToken, TokenClaims, TokenIssuer};
use crate::domain::value_object::session_token::SessionToken;

/// Why a presented token did not authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Failed the signature/expiry check
    #[error("invalid token: {0}")]
    InvalidToken(InvalidToken),
    /// Signed for a member that no longer exists
    #[error("token owner not found")]
    UnknownUser,
    /// Valid signature, but no longer on the member's allow-list
    #[error("token revoked")]
    Revoked,
    /// The store could not be consulted
    #[error("session store unavailable")]
    StoreUnavailable,
}

/// Authentication state of a request
///
/// A token that has been read but not yet checked only exists inside
/// [`CheckSessionUseCase::execute`]; requests always carry a settled state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// No session cookie
    #[default]
    NoToken,
    /// Token verified and active
    Authenticated(CurrentUser),
    /// Token presented but refused
    Rejected(RejectReason),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Check session use case
pub struct CheckSessionUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    issuer: TokenIssuer,
}

impl<R> CheckSessionUseCase<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: &AuthConfig) -> Self {
        Self {
            repo,
            issuer: config.token_issuer(),
        }
    }

    /// Resolve an optional cookie value into a settled state
    pub async fn execute(&self, token: Option<String>) -> SessionState {
        let Some(token) = token.map(SessionToken::new) else {
            return SessionState::NoToken;
        };

        let claims = match self.verify_signature(&token) {
            Ok(claims) => claims,
            Err(reason) => return SessionState::Rejected(reason),
        };

        match self.check_allow_list(&claims, token).await {
            Ok(user) => SessionState::Authenticated(user),
            Err(reason) => SessionState::Rejected(reason),
        }
    }

    /// Step 1: stateless signature and expiry check
    pub fn verify_signature(&self, token: &SessionToken) -> Result<TokenClaims, RejectReason> {
        self.issuer.verify(token).map_err(RejectReason::InvalidToken)
    }

    /// Step 2: the token must still be active for the member it names
    pub async fn check_allow_list(
        &self,
        claims: &TokenClaims,
        token: SessionToken,
    ) -> Result<CurrentUser, RejectReason> {
        let user = match self.repo.find_by_id(&claims.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(RejectReason::UnknownUser),
            Err(e) => {
                error!(error = %e, user_id = %claims.user_id, "Session lookup failed");
                return Err(RejectReason::StoreUnavailable);
            }
        };

        if !user.has_token(&token) {
            return Err(RejectReason::Revoked);
        }

        Ok(user.to_current_user(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::User;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{
        email::Email,
        user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use crate::infra::memory::InMemoryUserRepository;
    use chrono::{Duration, Utc};

    async fn setup() -> (InMemoryUserRepository, AuthConfig, User) {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        let raw = RawPassword::new("pw1".to_string()).unwrap();
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        repo.create(&user).await.unwrap();
        (repo, config, user)
    }

    #[tokio::test]
    async fn test_no_token() {
        let (repo, config, _) = setup().await;
        let use_case = CheckSessionUseCase::new(Arc::new(repo), &config);
        assert!(matches!(use_case.execute(None).await, SessionState::NoToken));
    }

    #[tokio::test]
    async fn test_active_token_authenticates() {
        let (repo, config, user) = setup().await;
        let issued = config.token_issuer().issue(&user.user_id);
        repo.append_token(&user.user_id, &issued.token).await.unwrap();

        let use_case = CheckSessionUseCase::new(Arc::new(repo), &config);
        let state = use_case
            .execute(Some(issued.token.as_str().to_string()))
            .await;

        let current = state.current_user().unwrap();
        assert_eq!(current.user_id, user.user_id);
        assert_eq!(current.token, issued.token);
    }

    #[tokio::test]
    async fn test_revoked_token_still_verifies_but_is_rejected() {
        let (repo, config, user) = setup().await;
        let issued = config.token_issuer().issue(&user.user_id);
        repo.append_token(&user.user_id, &issued.token).await.unwrap();
        repo.remove_token(&user.user_id, &issued.token).await.unwrap();

        let use_case = CheckSessionUseCase::new(Arc::new(repo), &config);

        // Step 1 alone passes
        let claims = use_case.verify_signature(&issued.token).unwrap();
        // Step 2 refuses
        assert_eq!(
            use_case
                .check_allow_list(&claims, issued.token.clone())
                .await
                .unwrap_err(),
            RejectReason::Revoked
        );
        assert!(matches!(
            use_case.execute(Some(issued.token.into_inner())).await,
            SessionState::Rejected(RejectReason::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_invalid_tokens_are_rejected_with_reason() {
        let (repo, config, user) = setup().await;
        let use_case = CheckSessionUseCase::new(Arc::new(repo.clone()), &config);

        let state = use_case.execute(Some("garbage".to_string())).await;
        assert!(matches!(
            state,
            SessionState::Rejected(RejectReason::InvalidToken(InvalidToken::Malformed))
        ));

        // Signed by another server
        let foreign = AuthConfig::development().token_issuer().issue(&user.user_id);
        repo.append_token(&user.user_id, &foreign.token).await.unwrap();
        let state = use_case.execute(Some(foreign.token.into_inner())).await;
        assert!(matches!(
            state,
            SessionState::Rejected(RejectReason::InvalidToken(InvalidToken::BadSignature))
        ));

        // Expired, even though still listed
        let stale = config
            .token_issuer()
            .issue_at(&user.user_id, Utc::now() - Duration::hours(48));
        repo.append_token(&user.user_id, &stale.token).await.unwrap();
        let state = use_case.execute(Some(stale.token.into_inner())).await;
        assert!(matches!(
            state,
            SessionState::Rejected(RejectReason::InvalidToken(InvalidToken::Expired))
        ));
    }

    #[tokio::test]
    async fn test_token_for_unknown_user() {
        let (repo, config, _) = setup().await;
        let issued = config.token_issuer().issue(&kernel::id::UserId::new());
        let use_case = CheckSessionUseCase::new(Arc::new(repo), &config);
        assert!(matches!(
            use_case.execute(Some(issued.token.into_inner())).await,
            SessionState::Rejected(RejectReason::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn test_two_sessions_are_independent() {
        let (repo, config, user) = setup().await;
        let issuer = config.token_issuer();
        let phone = issuer.issue(&user.user_id);
        let laptop = issuer.issue(&user.user_id);
        repo.append_token(&user.user_id, &phone.token).await.unwrap();
        repo.append_token(&user.user_id, &laptop.token).await.unwrap();
        repo.remove_token(&user.user_id, &phone.token).await.unwrap();

        let use_case = CheckSessionUseCase::new(Arc::new(repo), &config);
        assert!(
            !use_case
                .execute(Some(phone.token.into_inner()))
                .await
                .is_authenticated()
        );
        assert!(
            use_case
                .execute(Some(laptop.token.into_inner()))
                .await
                .is_authenticated()
        );
    }
}
