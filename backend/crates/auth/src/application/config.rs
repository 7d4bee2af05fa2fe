//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::{DateTime, Utc};
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_secret;

use crate::domain::service::TokenIssuer;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Lifetime of a session token and its cookie (24 hours)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "mfg_cookie".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    ///
    /// Tokens issued with it do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Token issuer keyed with this config's secret and TTL
    pub fn token_issuer(&self) -> TokenIssuer {
        // A TTL beyond chrono's range is a configuration error; clamp to a day
        let ttl = chrono::Duration::from_std(self.session_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        TokenIssuer::new(self.session_secret, ttl)
    }

    /// Cookie attributes for a session that ends at `expires_at`
    pub fn session_cookie(&self, expires_at: DateTime<Utc>) -> CookieConfig {
        self.base_cookie().expiring_at(expires_at)
    }

    /// Cookie attributes used to clear the session cookie
    pub fn clear_session_cookie(&self) -> CookieConfig {
        self.base_cookie()
    }

    fn base_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
            expires: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::UserId;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_cookie_name, "mfg_cookie");
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert!(config.cookie_secure);
        assert!(config.password_pepper.is_none());
    }

    #[test]
    fn test_development_is_insecure_and_random() {
        let a = AuthConfig::development();
        let b = AuthConfig::development();
        assert!(!a.cookie_secure);
        assert_ne!(a.session_secret, b.session_secret);
    }

    #[test]
    fn test_token_issuer_uses_ttl() {
        let config = AuthConfig::development();
        let issued = config.token_issuer().issue(&UserId::new());
        let remaining = issued.expires_at - Utc::now();
        assert!(remaining <= chrono::Duration::hours(24));
        assert!(remaining > chrono::Duration::hours(23));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = AuthConfig::development();
        let expires = Utc::now() + chrono::Duration::hours(24);
        let cookie = config.session_cookie(expires).build_set_cookie("tok");
        assert!(cookie.starts_with("mfg_cookie=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Expires="));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pepper\""));
        assert!(debug.contains("REDACTED"));
    }
}
