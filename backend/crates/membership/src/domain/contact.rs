//! Contact Entity
//!
//! A feedback submission from the contact form. Stored once and mailed to
//! the operator; nothing reads it back.

use auth::models::Email;
use chrono::{DateTime, Utc};
use kernel::id::ContactId;

use crate::error::{MembershipError, MembershipResult};

const MAX_AGE: i32 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub contact_id: ContactId,
    pub name: String,
    pub email: Email,
    pub age: i32,
    /// Phone number as typed
    pub contact: String,
    pub address: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form fields as submitted
#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub age: String,
    pub contact: String,
    pub address: String,
    pub message: String,
}

impl Contact {
    /// Validate a submission
    pub fn new(input: ContactInput) -> MembershipResult<Self> {
        let name = required("name", &input.name)?;
        let email = Email::new(&input.email)?;
        let age = input
            .age
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|age| (1..=MAX_AGE).contains(age))
            .ok_or_else(|| MembershipError::Validation("Invalid age".to_string()))?;
        let contact = required("contact number", &input.contact)?;
        let message = required("message", &input.message)?;

        Ok(Self {
            contact_id: ContactId::new(),
            name,
            email,
            age,
            contact,
            address: input.address.trim().to_string(),
            message,
            created_at: Utc::now(),
        })
    }
}

fn required(field: &str, value: &str) -> MembershipResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MembershipError::Validation(format!(
            "The {field} field is required"
        )));
    }
    Ok(value.to_string())
}

/// Operator notification for one feedback submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMail {
    /// Reply address (the visitor)
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl FeedbackMail {
    pub fn for_contact(contact: &Contact, receiver: &str) -> Self {
        Self {
            from: contact.email.to_string(),
            to: receiver.to_string(),
            subject: format!("MFG feedback by {} aged {}", contact.name, contact.age),
            text: format!(
                "Message : {} \nContact Number : {} \nAddress : {} \nfrom : {}",
                contact.message, contact.contact, contact.address, contact.email
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ContactInput {
        ContactInput {
            name: "Alice".to_string(),
            email: "Alice@Example.com".to_string(),
            age: "29".to_string(),
            contact: "9876543210".to_string(),
            address: "1 Gym Road".to_string(),
            message: "Do you open on Sundays?".to_string(),
        }
    }

    #[test]
    fn test_valid_contact() {
        let contact = Contact::new(input()).unwrap();
        assert_eq!(contact.name, "Alice");
        assert_eq!(contact.email.as_str(), "alice@example.com");
        assert_eq!(contact.age, 29);
    }

    #[test]
    fn test_invalid_fields() {
        let err = Contact::new(ContactInput {
            age: "old".to_string(),
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, MembershipError::Validation(ref m) if m == "Invalid age"));

        assert!(
            Contact::new(ContactInput {
                age: "0".to_string(),
                ..input()
            })
            .is_err()
        );
        assert!(
            Contact::new(ContactInput {
                message: "   ".to_string(),
                ..input()
            })
            .is_err()
        );
        assert!(
            Contact::new(ContactInput {
                email: "nope".to_string(),
                ..input()
            })
            .is_err()
        );
    }

    #[test]
    fn test_feedback_mail() {
        let contact = Contact::new(input()).unwrap();
        let mail = FeedbackMail::for_contact(&contact, "owner@mfg.example");

        assert_eq!(mail.from, "alice@example.com");
        assert_eq!(mail.to, "owner@mfg.example");
        assert_eq!(mail.subject, "MFG feedback by Alice aged 29");
        assert_eq!(
            mail.text,
            "Message : Do you open on Sundays? \nContact Number : 9876543210 \nAddress : 1 Gym Road \nfrom : alice@example.com"
        );
    }
}
