//! HTTP Handlers
//!
//! Every POST ends in a `303 See Other` carrying a flash message, including
//! one whose body cannot be decoded. The session cookie is only written
//! after the store accepted the token, and only cleared after the store
//! dropped it.

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, set_cookie_header};
use platform::flash::{Flash, redirect_with_flash, redirect_with_flash_and_cookies};
use platform::form::{BodyRejection, FormBody, UNREADABLE_FORM};
use platform::view::{HtmlPage, ViewContext};

use crate::application::config::AuthConfig;
use crate::application::{LoginUseCase, LogoutUseCase, RegisterUseCase, SessionState};
use crate::domain::entity::user::CurrentUser;
use crate::domain::repository::UserRepository;
use crate::domain::service::IssuedToken;
use crate::presentation::dto::{LoginForm, RegisterForm};
use crate::presentation::views;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// GET /register
pub async fn register_form(session: SessionState, headers: HeaderMap) -> Response {
    HtmlPage::new("Register", views::register_body())
        .render(ViewContext::from_headers(&headers, session.is_authenticated()))
}

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    form: Result<FormBody<RegisterForm>, BodyRejection>,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let form = match form {
        Ok(FormBody(form)) => form,
        Err(rejection) => return unreadable_body("/register", &rejection),
    };

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(form.into()).await {
        Ok(output) => redirect_with_flash_and_cookies(
            "/home",
            Flash::success(format!(
                "Hello {}. Welcome to Magic Fitness Gym's Elites!!",
                output.user.user_name
            )),
            vec![session_cookie(&state.config, &output.session)],
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/register", Flash::info(e.flash_message()))
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// GET /login
pub async fn login_form(session: SessionState, headers: HeaderMap) -> Response {
    HtmlPage::new("Login", views::login_body())
        .render(ViewContext::from_headers(&headers, session.is_authenticated()))
}

/// POST /login
pub async fn login<R>(
    session: SessionState,
    State(state): State<AuthAppState<R>>,
    form: Result<FormBody<LoginForm>, BodyRejection>,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if session.is_authenticated() {
        return redirect_with_flash("/home", Flash::info("Already logged in."));
    }

    let form = match form {
        Ok(FormBody(form)) => form,
        Err(rejection) => return unreadable_body("/login", &rejection),
    };

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(form.into()).await {
        Ok(output) => redirect_with_flash_and_cookies(
            "/home",
            Flash::success(format!("Welcome Back {}", output.user.user_name)),
            vec![session_cookie(&state.config, &output.session)],
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/login", Flash::fail(e.flash_message()))
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /end_session
///
/// Mounted behind `require_auth`; the `CurrentUser` extractor redirects to
/// the login page on its own when used without it.
pub async fn end_session<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone());

    match use_case.execute(&current).await {
        Ok(()) => redirect_with_flash_and_cookies(
            "/login",
            Flash::success(format!("Logged Out from {}", current.user_name)),
            vec![delete_cookie_header(&state.config.clear_session_cookie())],
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/login", Flash::fail(e.flash_message()))
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie(config: &AuthConfig, session: &IssuedToken) -> HeaderValue {
    set_cookie_header(
        &config.session_cookie(session.expires_at),
        session.token.as_str(),
    )
}

fn unreadable_body(back_to: &str, rejection: &BodyRejection) -> Response {
    tracing::warn!(error = %rejection, path = back_to, "Unreadable form body");
    redirect_with_flash(back_to, Flash::fail(UNREADABLE_FORM))
}
