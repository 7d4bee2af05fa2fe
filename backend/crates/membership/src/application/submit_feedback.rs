//! Submit Feedback Use Case
//!
//! Stores a contact-form submission, then mails it to the operator.

use std::sync::Arc;

use tracing::info;

use crate::application::config::MembershipConfig;
use crate::domain::contact::{Contact, ContactInput, FeedbackMail};
use crate::domain::repository::{ContactRepository, Mailer};
use crate::error::MembershipResult;

/// Submit feedback use case
pub struct SubmitFeedbackUseCase<C, M>
where
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    contacts: Arc<C>,
    mailer: Arc<M>,
    config: Arc<MembershipConfig>,
}

impl<C, M> SubmitFeedbackUseCase<C, M>
where
    C: ContactRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub fn new(contacts: Arc<C>, mailer: Arc<M>, config: Arc<MembershipConfig>) -> Self {
        Self {
            contacts,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: ContactInput) -> MembershipResult<Contact> {
        let contact = Contact::new(input)?;

        // Stored even if the mail fails afterwards
        self.contacts.create(&contact).await?;

        let mail = FeedbackMail::for_contact(&contact, &self.config.feedback_receiver);
        self.mailer.send(&mail).await?;

        info!(contact_id = %contact.contact_id, "Feedback received");
        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MembershipError;
    use crate::infra::mailer::RecordingMailer;
    use crate::infra::memory::InMemoryContactRepository;

    fn input(age: &str) -> ContactInput {
        ContactInput {
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            age: age.to_string(),
            contact: "12345".to_string(),
            address: "Pune".to_string(),
            message: "Great gym".to_string(),
        }
    }

    fn use_case(
        contacts: &InMemoryContactRepository,
        mailer: &RecordingMailer,
    ) -> SubmitFeedbackUseCase<InMemoryContactRepository, RecordingMailer> {
        SubmitFeedbackUseCase::new(
            Arc::new(contacts.clone()),
            Arc::new(mailer.clone()),
            Arc::new(MembershipConfig {
                feedback_receiver: "owner@mfg.example".to_string(),
                ..MembershipConfig::development()
            }),
        )
    }

    #[tokio::test]
    async fn test_feedback_is_stored_and_mailed() {
        let contacts = InMemoryContactRepository::new();
        let mailer = RecordingMailer::new();

        let contact = use_case(&contacts, &mailer).execute(input("40")).await.unwrap();

        assert_eq!(contacts.all().await, vec![contact]);
        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@mfg.example");
        assert_eq!(sent[0].subject, "MFG feedback by Bob aged 40");
    }

    #[tokio::test]
    async fn test_invalid_submission_is_neither_stored_nor_mailed() {
        let contacts = InMemoryContactRepository::new();
        let mailer = RecordingMailer::new();

        let err = use_case(&contacts, &mailer)
            .execute(input("forty"))
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::Validation(_)));
        assert!(contacts.all().await.is_empty());
        assert!(mailer.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_the_record() {
        let contacts = InMemoryContactRepository::new();
        let mailer = RecordingMailer::failing();

        let err = use_case(&contacts, &mailer)
            .execute(input("40"))
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::Mail(_)));
        assert_eq!(contacts.all().await.len(), 1);
    }
}
