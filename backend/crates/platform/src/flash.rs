//! Flash Messages
//!
//! One-shot notifications that survive a redirect. The message rides in a
//! short-lived cookie set on the redirect response; the next rendered page
//! reads it and clears it.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use crate::cookie::{CookieConfig, delete_cookie_header, extract_cookie, set_cookie_header};
use crate::crypto::{from_base64_url, to_base64_url};

/// Cookie carrying the pending flash message
pub const FLASH_COOKIE_NAME: &str = "mfg_flash";

/// Seconds a flash survives if nobody renders it
const FLASH_MAX_AGE_SECS: i64 = 60;

/// Flash category, rendered as a CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Fail,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Info => "info",
            FlashKind::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Fail, message)
    }

    /// Cookie-safe encoding (URL-safe base64 of JSON)
    pub fn encode(&self) -> String {
        // Serializing a struct of a unit enum and a String cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        to_base64_url(&json)
    }

    /// Decode a cookie value, `None` if it was tampered with or truncated
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = from_base64_url(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Set-Cookie header carrying this flash
    pub fn set_cookie(&self) -> HeaderValue {
        set_cookie_header(&flash_cookie_config(), &self.encode())
    }
}

// Not Secure: the payload is a UI notice, never a credential
fn flash_cookie_config() -> CookieConfig {
    CookieConfig {
        name: FLASH_COOKIE_NAME.to_string(),
        secure: false,
        max_age_secs: Some(FLASH_MAX_AGE_SECS),
        ..Default::default()
    }
}

/// Read the pending flash from request headers
///
/// Returns the message (if any) and the header that consumes it. The clear
/// header is only produced when a flash cookie was actually present.
pub fn take_flash(headers: &HeaderMap) -> (Option<Flash>, Option<HeaderValue>) {
    match extract_cookie(headers, FLASH_COOKIE_NAME) {
        Some(value) => (
            Flash::decode(&value),
            Some(delete_cookie_header(&flash_cookie_config())),
        ),
        None => (None, None),
    }
}

/// `303 See Other` to `to`, carrying `flash`
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    redirect_with_flash_and_cookies(to, flash, Vec::new())
}

/// Redirect with a flash plus extra `Set-Cookie` values (session cookie etc.)
pub fn redirect_with_flash_and_cookies(
    to: &str,
    flash: Flash,
    cookies: Vec<HeaderValue>,
) -> Response {
    let headers = cookies
        .into_iter()
        .chain(std::iter::once(flash.set_cookie()))
        .map(|value| (header::SET_COOKIE, value))
        .collect::<Vec<_>>();

    (AppendHeaders(headers), Redirect::to(to)).into_response()
}
