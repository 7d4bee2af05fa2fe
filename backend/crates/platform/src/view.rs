//! Page Shell
//!
//! Every HTML response is the same shell (navigation + flash area) around a
//! view-specific body. Views build their body as a string; this module owns
//! escaping, the navigation state and consuming the pending flash.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::flash::{Flash, take_flash};

/// Per-request rendering context
#[derive(Debug, Default)]
pub struct ViewContext {
    pub is_authenticated: bool,
    pub flash: Option<Flash>,
    consumed_flash: Option<HeaderValue>,
}

impl ViewContext {
    /// Build the context for a page render, consuming the pending flash
    pub fn from_headers(headers: &HeaderMap, is_authenticated: bool) -> Self {
        let (flash, consumed_flash) = take_flash(headers);
        Self {
            is_authenticated,
            flash,
            consumed_flash,
        }
    }
}

/// A fully rendered HTML page
#[derive(Debug)]
pub struct HtmlPage {
    status: StatusCode,
    title: String,
    body: String,
}

impl HtmlPage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Wrap the body in the shell and produce the response
    pub fn render(self, ctx: ViewContext) -> Response {
        let html = render_shell(&self.title, &ctx, &self.body);
        match ctx.consumed_flash {
            Some(clear) => (self.status, [(header::SET_COOKIE, clear)], Html(html)).into_response(),
            None => (self.status, Html(html)).into_response(),
        }
    }
}

fn render_shell(title: &str, ctx: &ViewContext, body: &str) -> String {
    let account_links = if ctx.is_authenticated {
        r#"<li><a href="/end_session">Logout</a></li>"#
    } else {
        r#"<li><a href="/login">Login</a></li><li><a href="/register">Register</a></li>"#
    };

    let flash = ctx
        .flash
        .as_ref()
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.kind.as_str(),
                escape_html(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} | Magic Fitness Gym</title></head>
<body>
<nav><ul>
<li><a href="/home">Home</a></li>
<li><a href="/about">About</a></li>
<li><a href="/contact">Contact</a></li>
<li><a href="/buy">Plans</a></li>
{account_links}
</ul></nav>
{flash}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FLASH_COOKIE_NAME;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Magic Fitness Gym's"), "Magic Fitness Gym&#39;s");
    }

    #[test]
    fn test_shell_navigation_depends_on_login() {
        let anonymous = ViewContext::default();
        let html = render_shell("Home", &anonymous, "<p>hi</p>");
        assert!(html.contains(r#"href="/login""#));
        assert!(!html.contains(r#"href="/end_session""#));

        let member = ViewContext {
            is_authenticated: true,
            ..Default::default()
        };
        let html = render_shell("Home", &member, "<p>hi</p>");
        assert!(html.contains(r#"href="/end_session""#));
    }

    #[test]
    fn test_render_consumes_flash() {
        let flash = Flash::fail("<b>Please login.</b>");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", FLASH_COOKIE_NAME, flash.encode())).unwrap(),
        );

        let ctx = ViewContext::from_headers(&headers, false);
        assert_eq!(ctx.flash.as_ref(), Some(&flash));

        let response = HtmlPage::new("Login", "").render(ctx);
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.starts_with(FLASH_COOKIE_NAME));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_render_without_flash_sets_no_cookie() {
        let response = HtmlPage::new("About", "")
            .with_status(StatusCode::NOT_FOUND)
            .render(ViewContext::default());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
