//! Integration test: assemble the auth and membership routers over the
//! in-memory stores and walk through pages, contact, plan selection and
//! purchase.

use auth::models::UserName;
use auth::{AuthConfig, InMemoryUserRepository, UserRepository};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use membership::{InMemoryContactRepository, Mailer, MembershipConfig, RecordingMailer};
use platform::flash::{FLASH_COOKIE_NAME, Flash};
use platform::form::UNREADABLE_FORM;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    users: InMemoryUserRepository,
    contacts: InMemoryContactRepository,
}

fn app_with_mailer<M>(mailer: M) -> TestApp
where
    M: Mailer + Send + Sync + 'static,
{
    let users = InMemoryUserRepository::new();
    let contacts = InMemoryContactRepository::new();
    let auth_config = AuthConfig::development();

    let routes = auth::auth_router_generic(users.clone(), auth_config.clone()).merge(
        membership::membership_router_generic(
            users.clone(),
            contacts.clone(),
            mailer,
            MembershipConfig {
                feedback_receiver: "owner@mfg.example".to_string(),
                ..MembershipConfig::development()
            },
        ),
    );
    let router = auth::with_session_resolution(routes, users.clone(), auth_config);

    TestApp {
        router,
        users,
        contacts,
    }
}

fn app() -> TestApp {
    app_with_mailer(RecordingMailer::new())
}

impl TestApp {
    async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("request")
    }

    /// Register `name` and return the session token
    async fn register(&self, name: &str) -> String {
        let body = format!(
            "username={name}&email={name}%40example.com&password=pw1&confirm_pass=pw1"
        );
        let resp = self.send(post("/register", &body, &[])).await;
        assert_eq!(location(&resp), "/home");
        cookie_value(&resp, "mfg_cookie").expect("session cookie")
    }
}

fn post(uri: &str, body: &str, cookies: &[(&str, &str)]) -> Request<Body> {
    with_cookies(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
        cookies,
    )
    .body(Body::from(body.to_string()))
    .expect("request")
}

fn get(uri: &str, cookies: &[(&str, &str)]) -> Request<Body> {
    with_cookies(Request::builder().uri(uri), cookies)
        .body(Body::empty())
        .expect("request")
}

fn with_cookies(
    builder: axum::http::request::Builder,
    cookies: &[(&str, &str)],
) -> axum::http::request::Builder {
    if cookies.is_empty() {
        return builder;
    }
    let header_value = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");
    builder.header(header::COOKIE, header_value)
}

fn set_cookies<B>(resp: &Response<B>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect()
}

fn cookie_value<B>(resp: &Response<B>, name: &str) -> Option<String> {
    set_cookies(resp).into_iter().find_map(|c| {
        let pair = c.split(';').next().unwrap_or_default();
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn flash<B>(resp: &Response<B>) -> Flash {
    let value = cookie_value(resp, FLASH_COOKIE_NAME).expect("flash cookie");
    Flash::decode(&value).expect("decodable flash")
}

fn location<B>(resp: &Response<B>) -> &str {
    resp.headers()[header::LOCATION].to_str().expect("location")
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

const BILLING: &str = "name=Alice&email=alice%40example.com&contact=9876543210&address=1+Gym+Road";

#[tokio::test]
async fn logged_out_cookie_cannot_purchase() {
    let app = app();
    let token = app.register("alice").await;

    let resp = app.send(get("/end_session", &[("mfg_cookie", token.as_str())])).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert!(
        set_cookies(&resp)
            .iter()
            .any(|c| c.starts_with("mfg_cookie=;") && c.contains("Max-Age=0"))
    );

    let resp = app
        .send(post(
            "/purchase",
            BILLING,
            &[("mfg_cookie", token.as_str()), ("mfg_plan", "pro")],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(flash(&resp), Flash::fail("Please login."));

    let alice = app
        .users
        .find_by_user_name(&UserName::new("alice").expect("name"))
        .await
        .expect("store")
        .expect("alice");
    assert!(alice.purchase_records.is_empty());
    assert!(alice.tokens.is_empty());
}

#[tokio::test]
async fn buy_requires_login() {
    let app = app();
    let resp = app.send(post("/buy?plan=pro&price=2999", "", &[])).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(flash(&resp), Flash::fail("Please login."));
    assert!(cookie_value(&resp, "mfg_plan").is_none());
}

#[tokio::test]
async fn buy_then_purchase_records_catalog_price() {
    let app = app();
    let token = app.register("alice").await;

    // Client claims a bogus price; the catalog wins
    let resp = app
        .send(post("/buy?plan=pro&price=1", "", &[("mfg_cookie", token.as_str())]))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(cookie_value(&resp, "mfg_plan").as_deref(), Some("pro"));
    let html = body_text(resp).await;
    assert!(html.contains("PRO"));
    assert!(html.contains("alice@example.com"));
    assert!(html.contains("Personal Trainer"));

    let resp = app
        .send(post(
            "/purchase",
            BILLING,
            &[("mfg_cookie", token.as_str()), ("mfg_plan", "pro")],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/purchase");
    assert_eq!(
        flash(&resp),
        Flash::success("Thank you alice for the Purchase. You will receive the order soon!")
    );

    let alice = app
        .users
        .find_by_user_name(&UserName::new("alice").expect("name"))
        .await
        .expect("store")
        .expect("alice");
    assert_eq!(alice.purchase_records.len(), 1);
    let record = &alice.purchase_records[0];
    assert_eq!(record.plan, "pro");
    assert_eq!(record.price, 2999);
    assert_eq!(record.address, "1 Gym Road");
}

#[tokio::test]
async fn unknown_plan_goes_back_to_plans() {
    let app = app();
    let token = app.register("alice").await;

    let resp = app
        .send(post("/buy?plan=gold", "", &[("mfg_cookie", token.as_str())]))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/buy");
    assert_eq!(flash(&resp), Flash::fail("Unknown plan: gold"));
    assert!(cookie_value(&resp, "mfg_plan").is_none());
}

#[tokio::test]
async fn purchase_without_plan_reports_error() {
    let app = app();
    let token = app.register("alice").await;

    let resp = app
        .send(post("/purchase", BILLING, &[("mfg_cookie", token.as_str())]))
        .await;
    assert_eq!(location(&resp), "/purchase");
    assert_eq!(flash(&resp), Flash::fail("Please choose a plan first."));
}

#[tokio::test]
async fn purchase_details_are_per_client() {
    let app = app();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    app.send(post("/buy?plan=novice", "", &[("mfg_cookie", alice.as_str())]))
        .await;
    app.send(post("/buy?plan=pro", "", &[("mfg_cookie", bob.as_str())]))
        .await;

    let html = body_text(
        app.send(get(
            "/purchase",
            &[("mfg_cookie", alice.as_str()), ("mfg_plan", "novice")],
        ))
        .await,
    )
    .await;
    assert!(html.contains("NOVICE"));
    assert!(html.contains("alice@example.com"));
    assert!(!html.contains("bob@example.com"));

    let html = body_text(
        app.send(get("/purchase", &[("mfg_cookie", bob.as_str()), ("mfg_plan", "pro")]))
            .await,
    )
    .await;
    assert!(html.contains("PRO"));
    assert!(html.contains("bob@example.com"));

    // A fresh visitor has chosen nothing
    let html = body_text(app.send(get("/purchase", &[])).await).await;
    assert!(html.contains("No plan selected yet."));
}

#[tokio::test]
async fn contact_feedback_is_stored_and_mailed() {
    let mailer = RecordingMailer::new();
    let app = app_with_mailer(mailer.clone());

    let resp = app
        .send(post(
            "/contact",
            "name=Bob&email=bob%40example.com&age=31&contact=12345&address=Pune&mail_data=Hello",
            &[],
        ))
        .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact");
    assert_eq!(
        flash(&resp),
        Flash::success("Thanks for the Feedback. We will reach out to you soon!")
    );
    assert_eq!(app.contacts.all().await.len(), 1);

    let sent = mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "MFG feedback by Bob aged 31");
    assert_eq!(sent[0].to, "owner@mfg.example");
}

#[tokio::test]
async fn contact_failure_shows_generic_message() {
    let app = app_with_mailer(RecordingMailer::failing());

    let resp = app
        .send(post(
            "/contact",
            "name=Bob&email=bob%40example.com&age=31&contact=12345&address=Pune&mail_data=Hello",
            &[],
        ))
        .await;
    assert_eq!(location(&resp), "/contact");
    assert_eq!(
        flash(&resp),
        Flash::fail("Something went wrong. Please try again later.")
    );

    let resp = app
        .send(post("/contact", "name=Bob&age=unknown", &[]))
        .await;
    assert_eq!(
        flash(&resp),
        Flash::fail("Something went wrong. Please try again later.")
    );
}

#[tokio::test]
async fn public_pages_render() {
    let app = app();

    for path in ["/", "/home", "/about", "/contact", "/buy", "/purchase"] {
        let resp = app.send(get(path, &[])).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }

    let resp = app.send(get("/no/such/page", &[])).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("404"));
}

#[tokio::test]
async fn navigation_reflects_session() {
    let app = app();
    let token = app.register("alice").await;

    let html = body_text(app.send(get("/home", &[("mfg_cookie", token.as_str())])).await).await;
    assert!(html.contains(r#"href="/end_session""#));

    let html = body_text(app.send(get("/home", &[])).await).await;
    assert!(html.contains(r#"href="/login""#));
}

#[tokio::test]
async fn json_contact_with_numeric_fields_is_accepted() {
    let mailer = RecordingMailer::new();
    let app = app_with_mailer(mailer.clone());

    let req = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"name":"Bob","email":"bob@example.com","age":31,"contact":12345,"address":"Pune","mail_data":"Hello"}"#,
        ))
        .expect("request");
    let resp = app.send(req).await;

    assert_eq!(location(&resp), "/contact");
    assert_eq!(
        flash(&resp),
        Flash::success("Thanks for the Feedback. We will reach out to you soon!")
    );
    assert_eq!(mailer.sent().await[0].subject, "MFG feedback by Bob aged 31");
}

#[tokio::test]
async fn unreadable_bodies_redirect_with_flash() {
    let app = app();
    let token = app.register("alice").await;

    let req = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .expect("request");
    let resp = app.send(req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/contact");
    assert_eq!(
        flash(&resp),
        Flash::fail("Something went wrong. Please try again later.")
    );
    assert!(app.contacts.all().await.is_empty());

    let resp = app
        .send(post(
            "/purchase",
            "name=Alice&name=Eve&email=alice%40example.com&contact=1&address=x",
            &[("mfg_cookie", token.as_str()), ("mfg_plan", "pro")],
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/purchase");
    assert_eq!(flash(&resp), Flash::fail(UNREADABLE_FORM));

    let alice = app
        .users
        .find_by_user_name(&UserName::new("alice").expect("name"))
        .await
        .expect("store")
        .expect("alice");
    assert!(alice.purchase_records.is_empty());
}
