//! Form DTOs
//!
//! Field names follow the HTML forms. Missing fields deserialize as empty
//! strings so that validation, not the extractor, reports them.

use serde::Deserialize;

use crate::application::{LoginInput, RegisterInput};

/// `POST /register` body
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_pass: String,
}

impl From<RegisterForm> for RegisterInput {
    fn from(form: RegisterForm) -> Self {
        RegisterInput {
            user_name: form.username,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_pass,
        }
    }
}

/// `POST /login` body
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl From<LoginForm> for LoginInput {
    fn from(form: LoginForm) -> Self {
        LoginInput {
            user_name: form.username,
            password: form.password,
        }
    }
}
