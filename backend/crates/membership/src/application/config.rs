//! Application Configuration
//!
//! Configuration for the Membership application layer.

use std::fmt;

use platform::cookie::CookieConfig;

/// Membership application configuration
#[derive(Clone)]
pub struct MembershipConfig {
    /// Operator address receiving contact-form feedback
    pub feedback_receiver: String,
    /// `From` of feedback mail sent through the relay
    pub feedback_sender: String,
    /// SMTP relay URL, may carry credentials; `None` logs mail instead
    pub smtp_url: Option<String>,
    /// Cookie remembering the plan chosen on `/buy`
    pub plan_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            feedback_receiver: "feedback@localhost".to_string(),
            feedback_sender: "Magic Fitness Gym <noreply@localhost>".to_string(),
            smtp_url: None,
            plan_cookie_name: "mfg_plan".to_string(),
            cookie_secure: true,
        }
    }
}

impl MembershipConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Session-scoped plan cookie (no expiry)
    pub fn plan_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.plan_cookie_name.clone(),
            secure: self.cookie_secure,
            ..Default::default()
        }
    }
}

impl fmt::Debug for MembershipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipConfig")
            .field("feedback_receiver", &self.feedback_receiver)
            .field("feedback_sender", &self.feedback_sender)
            .field("smtp_url", &self.smtp_url.as_ref().map(|_| "[REDACTED]"))
            .field("plan_cookie_name", &self.plan_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}
