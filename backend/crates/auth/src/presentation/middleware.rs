//! Session Middleware
//!
//! [`resolve_session`] runs on every request and stores the settled
//! [`SessionState`] in the request extensions. [`require_auth`] guards
//! member-only routes by redirecting everyone else to the login page.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use platform::cookie::extract_cookie;
use platform::flash::{Flash, redirect_with_flash};

use crate::application::config::AuthConfig;
use crate::application::{CheckSessionUseCase, RejectReason, SessionState};
use crate::domain::entity::user::CurrentUser;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Resolve the session cookie for every request
///
/// Never rejects by itself; routes decide whether they need a member.
pub async fn resolve_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let session = CheckSessionUseCase::new(state.repo.clone(), &state.config)
        .execute(token)
        .await;

    if let SessionState::Rejected(reason) = &session {
        // Store failures were already logged at error level
        if *reason != RejectReason::StoreUnavailable {
            warn!(reason = %reason, path = %req.uri().path(), "Session rejected");
        }
    }

    req.extensions_mut().insert(session);
    next.run(req).await
}

/// Let only authenticated requests through
pub async fn require_auth(req: Request, next: Next) -> Response {
    let authenticated = req
        .extensions()
        .get::<SessionState>()
        .is_some_and(SessionState::is_authenticated);

    if !authenticated {
        return please_login();
    }

    next.run(req).await
}

/// Redirect to `/login` with "Please login."
pub fn please_login() -> Response {
    redirect_with_flash(
        "/login",
        Flash::fail(AuthError::Unauthenticated.flash_message()),
    )
}

impl<S> FromRequestParts<S> for SessionState
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .unwrap_or_default())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionState>() {
            Some(SessionState::Authenticated(user)) => Ok(user.clone()),
            _ => Err(please_login()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::{Router, routing::get};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::{
        email::Email,
        user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use crate::infra::memory::InMemoryUserRepository;

    async fn whoami(session: SessionState) -> String {
        match session {
            SessionState::NoToken => "anonymous".to_string(),
            SessionState::Authenticated(user) => user.user_name.to_string(),
            SessionState::Rejected(reason) => format!("rejected: {reason}"),
        }
    }

    async fn members_only(user: CurrentUser) -> String {
        format!("hello {}", user.user_name)
    }

    fn app(repo: InMemoryUserRepository, config: AuthConfig) -> Router {
        let state = AuthMiddlewareState {
            repo: Arc::new(repo),
            config: Arc::new(config),
        };
        Router::new()
            .route("/whoami", get(whoami))
            .route(
                "/members",
                get(members_only).route_layer(axum::middleware::from_fn(require_auth)),
            )
            .layer(axum::middleware::from_fn_with_state(
                state,
                resolve_session::<InMemoryUserRepository>,
            ))
    }

    async fn member(repo: &InMemoryUserRepository, config: &AuthConfig) -> String {
        let raw = RawPassword::new("pw1".to_string()).unwrap();
        let user = User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        repo.create(&user).await.unwrap();
        let issued = config.token_issuer().issue(&user.user_id);
        repo.append_token(&user.user_id, &issued.token).await.unwrap();
        issued.token.into_inner()
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("mfg_cookie={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_request() {
        let app = app(InMemoryUserRepository::new(), AuthConfig::development());
        let response = app.oneshot(get_with_cookie("/whoami", None)).await.unwrap();
        assert_eq!(body_text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_authenticated_request() {
        let repo = InMemoryUserRepository::new();
        let config = AuthConfig::development();
        let token = member(&repo, &config).await;
        let app = app(repo, config);

        let response = app
            .clone()
            .oneshot(get_with_cookie("/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "alice");

        let response = app
            .oneshot(get_with_cookie("/members", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "hello alice");
    }

    #[tokio::test]
    async fn test_rejected_token_is_anonymous_for_open_routes() {
        let app = app(InMemoryUserRepository::new(), AuthConfig::development());
        let response = app
            .oneshot(get_with_cookie("/whoami", Some("forged.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.starts_with("rejected"));
    }

    #[tokio::test]
    async fn test_members_route_redirects_to_login() {
        let app = app(InMemoryUserRepository::new(), AuthConfig::development());
        let response = app
            .oneshot(get_with_cookie("/members", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let flash = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let value = flash
            .strip_prefix("mfg_flash=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        assert_eq!(
            Flash::decode(value).unwrap(),
            Flash::fail("Please login.")
        );
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_defaults_to_no_token() {
        let app = Router::new().route("/whoami", get(whoami));
        let response = app.oneshot(get_with_cookie("/whoami", None)).await.unwrap();
        assert_eq!(body_text(response).await, "anonymous");
    }
}
