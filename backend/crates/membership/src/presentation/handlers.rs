//! HTTP Handlers
//!
//! Page renders answer `200` (`201` for a plan selection); every POST that
//! changes state ends in a `303 See Other` carrying a flash message, also
//! when its body cannot be decoded.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use std::sync::Arc;
use tracing::warn;

use auth::{CurrentUser, SessionState, UserRepository};
use platform::cookie::{extract_cookie, set_cookie_header};
use platform::flash::{Flash, redirect_with_flash};
use platform::form::{BodyRejection, FormBody, UNREADABLE_FORM};
use platform::view::{HtmlPage, ViewContext};

use crate::application::config::MembershipConfig;
use crate::application::{PurchaseUseCase, SubmitFeedbackUseCase, select_plan as choose_plan};
use crate::domain::plan::{Plan, PurchaseDetails};
use crate::domain::repository::{ContactRepository, Mailer};
use crate::error::GENERIC_FAILURE;
use crate::presentation::dto::{BuyQuery, ContactForm, PurchaseForm};
use crate::presentation::views;

/// Shared state for membership handlers
pub struct MembershipAppState<R, C, M> {
    pub users: Arc<R>,
    pub contacts: Arc<C>,
    pub mailer: Arc<M>,
    pub config: Arc<MembershipConfig>,
}

// Manual impl: a derive would require `R`, `C` and `M` to be Clone.
impl<R, C, M> Clone for MembershipAppState<R, C, M> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            contacts: self.contacts.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Static pages
// ============================================================================

/// GET / and GET /home
pub async fn home(session: SessionState, headers: HeaderMap) -> Response {
    page("Home", views::home_body(), &session, &headers)
}

/// GET /about
pub async fn about(session: SessionState, headers: HeaderMap) -> Response {
    page("About", views::about_body(), &session, &headers)
}

/// Fallback for unknown paths
pub async fn not_found(session: SessionState, headers: HeaderMap) -> Response {
    HtmlPage::new("Not Found", views::not_found_body())
        .with_status(StatusCode::NOT_FOUND)
        .render(ViewContext::from_headers(&headers, session.is_authenticated()))
}

// ============================================================================
// Contact
// ============================================================================

/// GET /contact
pub async fn contact_form(session: SessionState, headers: HeaderMap) -> Response {
    page("Contact", views::contact_body(), &session, &headers)
}

/// POST /contact
pub async fn submit_contact<R, C, M>(
    State(state): State<MembershipAppState<R, C, M>>,
    form: Result<FormBody<ContactForm>, BodyRejection>,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let form = match form {
        Ok(FormBody(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable contact form");
            return redirect_with_flash("/contact", Flash::fail(GENERIC_FAILURE));
        }
    };

    let use_case = SubmitFeedbackUseCase::new(
        state.contacts.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    match use_case.execute(form.into()).await {
        Ok(_) => redirect_with_flash(
            "/contact",
            Flash::success("Thanks for the Feedback. We will reach out to you soon!"),
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/contact", Flash::fail(GENERIC_FAILURE))
        }
    }
}

// ============================================================================
// Plans
// ============================================================================

/// GET /buy
pub async fn buy_page(session: SessionState, headers: HeaderMap) -> Response {
    page("Plans", views::buy_body(), &session, &headers)
}

/// POST /buy?plan=..&price=..
///
/// Mounted behind `require_auth`. Renders the purchase form right away and
/// remembers the plan for `GET /purchase` in the visitor's plan cookie.
pub async fn select_plan<R, C, M>(
    State(state): State<MembershipAppState<R, C, M>>,
    member: CurrentUser,
    headers: HeaderMap,
    Query(query): Query<BuyQuery>,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    match choose_plan(&member, query.into()) {
        Ok(details) => {
            let plan_cookie = details
                .plan
                .map(|plan| set_cookie_header(&state.config.plan_cookie(), plan.code()));

            let mut response = HtmlPage::new("Purchase", views::purchase_body(&details))
                .with_status(StatusCode::CREATED)
                .render(ViewContext::from_headers(&headers, true));
            if let Some(cookie) = plan_cookie {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(e) => {
            e.log();
            redirect_with_flash("/buy", Flash::fail(e.flash_message()))
        }
    }
}

// ============================================================================
// Purchase
// ============================================================================

/// GET /purchase
pub async fn purchase_page<R, C, M>(
    State(state): State<MembershipAppState<R, C, M>>,
    session: SessionState,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let plan = selected_plan(&headers, &state.config);
    let details = PurchaseDetails::new(session.current_user(), plan);

    page("Purchase", views::purchase_body(&details), &session, &headers)
}

/// POST /purchase
///
/// Mounted behind `require_auth`.
pub async fn purchase<R, C, M>(
    State(state): State<MembershipAppState<R, C, M>>,
    member: CurrentUser,
    headers: HeaderMap,
    form: Result<FormBody<PurchaseForm>, BodyRejection>,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let form = match form {
        Ok(FormBody(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable purchase form");
            return redirect_with_flash("/purchase", Flash::fail(UNREADABLE_FORM));
        }
    };

    let plan = selected_plan(&headers, &state.config);
    let use_case = PurchaseUseCase::new(state.users.clone());

    match use_case.execute(&member, plan, form.into()).await {
        Ok(_) => redirect_with_flash(
            "/purchase",
            Flash::success(format!(
                "Thank you {} for the Purchase. You will receive the order soon!",
                member.user_name
            )),
        ),
        Err(e) => {
            e.log();
            redirect_with_flash("/purchase", Flash::fail(e.flash_message()))
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn page(
    title: &str,
    body: impl Into<String>,
    session: &SessionState,
    headers: &HeaderMap,
) -> Response {
    HtmlPage::new(title, body)
        .render(ViewContext::from_headers(headers, session.is_authenticated()))
}

/// Plan remembered by the plan cookie; an unknown code counts as none
fn selected_plan(headers: &HeaderMap, config: &MembershipConfig) -> Option<Plan> {
    extract_cookie(headers, &config.plan_cookie_name)?.parse().ok()
}
