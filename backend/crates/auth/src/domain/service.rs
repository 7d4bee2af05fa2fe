//! Token Issuer
//!
//! Stateless, signed session tokens.
//!
//! Format: `{user_id}.{expires_at_ms}.{nonce}.{signature}` where nonce and
//! signature are URL-safe base64 and the signature is HMAC-SHA256 over the
//! first three segments. The nonce keeps two tokens issued for the same
//! member in the same millisecond distinct.
//!
//! Verification here only proves the token was minted by this server and is
//! unexpired. Whether it is still active is decided by the member's
//! allow-list in the store.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use kernel::id::UserId;
use sha2::Sha256;
use thiserror::Error;

use platform::crypto::{from_base64_url, random_bytes, to_base64_url};

use crate::domain::value_object::session_token::SessionToken;

type HmacSha256 = Hmac<Sha256>;

/// Nonce length in bytes
const NONCE_LEN: usize = 12;

/// Why a token failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidToken {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

/// Identity proven by a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// A freshly minted token and the instant it stops verifying
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: SessionToken,
    pub expires_at: DateTime<Utc>,
}

/// Mints and verifies session tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: [u8; 32],
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: [u8; 32], ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id`, valid for the configured TTL
    pub fn issue(&self, user_id: &UserId) -> IssuedToken {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: &UserId, now: DateTime<Utc>) -> IssuedToken {
        let expires_at = now + self.ttl;
        let nonce = to_base64_url(&random_bytes(NONCE_LEN));
        let payload = format!("{}.{}.{}", user_id, expires_at.timestamp_millis(), nonce);
        let signature = to_base64_url(&self.mac(&payload).finalize().into_bytes());

        IssuedToken {
            token: SessionToken::new(format!("{payload}.{signature}")),
            expires_at,
        }
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &SessionToken) -> Result<TokenClaims, InvalidToken> {
        self.verify_at(token, Utc::now())
    }

    /// Verify as if the current time were `now`
    ///
    /// The signature is checked before any field is interpreted.
    pub fn verify_at(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, InvalidToken> {
        let (payload, signature_b64) = token
            .as_str()
            .rsplit_once('.')
            .ok_or(InvalidToken::Malformed)?;

        let parts: Vec<&str> = payload.split('.').collect();
        let [user_id, expires_ms, nonce] = parts.as_slice() else {
            return Err(InvalidToken::Malformed);
        };
        if nonce.is_empty() {
            return Err(InvalidToken::Malformed);
        }

        let signature = from_base64_url(signature_b64).map_err(|_| InvalidToken::Malformed)?;
        self.mac(payload)
            .verify_slice(&signature)
            .map_err(|_| InvalidToken::BadSignature)?;

        let user_id: UserId = user_id.parse().map_err(|_| InvalidToken::Malformed)?;
        let expires_at = expires_ms
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or(InvalidToken::Malformed)?;

        if now >= expires_at {
            return Err(InvalidToken::Expired);
        }

        Ok(TokenClaims {
            user_id,
            expires_at,
        })
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
