//! Auth Router

use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth, resolve_session};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
///
/// `/end_session` needs the session resolved by [`with_session_resolution`].
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register::<R>),
        )
        .route("/login", get(handlers::login_form).post(handlers::login::<R>))
        .route(
            "/end_session",
            get(handlers::end_session::<R>).route_layer(middleware::from_fn(require_auth)),
        )
        .with_state(state)
}

/// Resolve the session of every request routed through `router`
///
/// Apply once, to the fully merged application router.
pub fn with_session_resolution<R>(router: Router, repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthMiddlewareState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    router.layer(middleware::from_fn_with_state(state, resolve_session::<R>))
}
