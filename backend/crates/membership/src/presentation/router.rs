//! Membership Router

use auth::middleware::require_auth;
use auth::{PgAuthRepository, UserRepository};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::domain::repository::{ContactRepository, Mailer};
use crate::infra::{OperatorMailer, PgContactRepository};
use crate::presentation::handlers::{self, MembershipAppState};

/// Create the Membership router with PostgreSQL repositories
pub fn membership_router(
    users: PgAuthRepository,
    contacts: PgContactRepository,
    mailer: OperatorMailer,
    config: MembershipConfig,
) -> Router {
    membership_router_generic(users, contacts, mailer, config)
}

/// Create a generic Membership router for any store and mailer
///
/// Owns the `404` fallback, so merge it into the application router rather
/// than nesting it. Member-only routes need the session resolved by
/// [`auth::with_session_resolution`].
pub fn membership_router_generic<R, C, M>(
    users: R,
    contacts: C,
    mailer: M,
    config: MembershipConfig,
) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let state = MembershipAppState {
        users: Arc::new(users),
        contacts: Arc::new(contacts),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::home))
        .route("/home", get(handlers::home))
        .route("/about", get(handlers::about))
        .route(
            "/contact",
            get(handlers::contact_form).post(handlers::submit_contact::<R, C, M>),
        )
        .route(
            "/buy",
            get(handlers::buy_page).merge(
                post(handlers::select_plan::<R, C, M>)
                    .route_layer(middleware::from_fn(require_auth)),
            ),
        )
        .route(
            "/purchase",
            get(handlers::purchase_page::<R, C, M>).merge(
                post(handlers::purchase::<R, C, M>)
                    .route_layer(middleware::from_fn(require_auth)),
            ),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}
