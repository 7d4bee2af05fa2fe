//! Form and Query DTOs
//!
//! Field names follow the HTML forms. Missing fields deserialize as empty
//! strings so that validation, not the extractor, reports them. Numeric
//! fields also accept JSON numbers.

use platform::form::string_or_number;
use serde::Deserialize;

use crate::application::{PurchaseInput, SelectPlanInput};
use crate::domain::contact::ContactInput;

/// `POST /contact` body
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(deserialize_with = "string_or_number")]
    pub contact: String,
    pub address: String,
    pub mail_data: String,
}

impl From<ContactForm> for ContactInput {
    fn from(form: ContactForm) -> Self {
        ContactInput {
            name: form.name,
            email: form.email,
            age: form.age,
            contact: form.contact,
            address: form.address,
            message: form.mail_data,
        }
    }
}

/// `POST /buy` query string
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct BuyQuery {
    pub plan: String,
    pub price: Option<String>,
}

impl From<BuyQuery> for SelectPlanInput {
    fn from(query: BuyQuery) -> Self {
        SelectPlanInput {
            plan: query.plan,
            price: query.price,
        }
    }
}

/// `POST /purchase` body
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct PurchaseForm {
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "string_or_number")]
    pub contact: String,
    pub address: String,
}

impl From<PurchaseForm> for PurchaseInput {
    fn from(form: PurchaseForm) -> Self {
        PurchaseInput {
            name: form.name,
            email: form.email,
            contact: form.contact,
            address: form.address,
        }
    }
}
