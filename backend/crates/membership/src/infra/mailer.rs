//! Mailer Implementations
//!
//! [`LogMailer`] writes the mail to the log, [`RecordingMailer`] keeps it
//! in memory for inspection. [`OperatorMailer`] is what the server runs
//! with: SMTP when a relay is configured (feature `smtp`), the log
//! otherwise.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::application::config::MembershipConfig;
use crate::domain::contact::FeedbackMail;
use crate::domain::repository::Mailer;
use crate::error::{MembershipError, MembershipResult};
#[cfg(feature = "smtp")]
use crate::infra::smtp::SmtpMailer;

/// Mailer chosen from [`MembershipConfig`]
#[derive(Clone)]
pub enum OperatorMailer {
    Log(LogMailer),
    #[cfg(feature = "smtp")]
    Smtp(SmtpMailer),
}

impl OperatorMailer {
    /// SMTP if `smtp_url` is set, the log otherwise
    ///
    /// A configured relay without the `smtp` feature is an error rather
    /// than a silent fallback.
    pub fn from_config(config: &MembershipConfig) -> MembershipResult<Self> {
        match &config.smtp_url {
            None => Ok(OperatorMailer::Log(LogMailer)),
            #[cfg(feature = "smtp")]
            Some(url) => Ok(OperatorMailer::Smtp(SmtpMailer::from_url(
                url,
                &config.feedback_sender,
            )?)),
            #[cfg(not(feature = "smtp"))]
            Some(_) => Err(MembershipError::Internal(
                "SMTP_URL is set but mail delivery was built without the smtp feature".to_string(),
            )),
        }
    }

    pub fn is_smtp(&self) -> bool {
        !matches!(self, OperatorMailer::Log(_))
    }
}

impl Mailer for OperatorMailer {
    async fn send(&self, mail: &FeedbackMail) -> MembershipResult<()> {
        match self {
            OperatorMailer::Log(mailer) => mailer.send(mail).await,
            #[cfg(feature = "smtp")]
            OperatorMailer::Smtp(mailer) => mailer.send(mail).await,
        }
    }
}

/// Mailer that logs every message at `info`
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: &FeedbackMail) -> MembershipResult<()> {
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.text,
            "Feedback mail"
        );
        Ok(())
    }
}

/// Mailer that remembers what it was asked to send
#[derive(Clone, Debug, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<FeedbackMail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose every delivery fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<FeedbackMail> {
        self.sent.lock().await.clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, mail: &FeedbackMail) -> MembershipResult<()> {
        if self.fail {
            return Err(MembershipError::Mail("transport unavailable".to_string()));
        }
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}
