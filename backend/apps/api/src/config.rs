//! Server Configuration
//!
//! Everything the binary reads from the environment, resolved once at
//! startup. Missing production secrets abort startup instead of falling back
//! to development defaults.

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use membership::MembershipConfig;
use std::env;

const DEFAULT_PORT: u16 = 80;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` runs on the in-memory stores
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
    pub membership: MembershipConfig,
}

impl ServerConfig {
    /// Load from process environment (after `.env` was applied)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// Load from an arbitrary key lookup
    ///
    /// `development` allows a random session secret and defaults cookies to
    /// non-Secure.
    pub fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(port) => port.trim().parse().context("PORT must be a port number")?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(n) => n
                .trim()
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let session_secret = match var("SESSION_SECRET") {
            Some(secret_b64) => decode_secret(&secret_b64)?,
            None if development => AuthConfig::with_random_secret().session_secret,
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(flag) => parse_bool(&flag).context("COOKIE_SECURE must be true or false")?,
            None => !development,
        };

        let auth = AuthConfig {
            session_secret,
            cookie_secure,
            password_pepper: var("PASSWORD_PEPPER").map(String::into_bytes),
            ..AuthConfig::default()
        };

        let defaults = MembershipConfig::default();
        let membership = MembershipConfig {
            feedback_receiver: var("FEEDBACK_RECEIVER").unwrap_or(defaults.feedback_receiver),
            feedback_sender: var("FEEDBACK_SENDER").unwrap_or(defaults.feedback_sender),
            smtp_url: var("SMTP_URL"),
            cookie_secure,
            ..defaults
        };

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            db_max_connections,
            auth,
            membership,
        })
    }
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .context("SESSION_SECRET must be base64")?;

    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        anyhow::anyhow!(
            "SESSION_SECRET must decode to 32 bytes, got {}",
            bytes.len()
        )
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
