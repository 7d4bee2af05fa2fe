//! Value Object Module

pub mod email;
pub mod session_token;
pub mod user_name;
pub mod user_password;

pub use email::Email;
pub use session_token::SessionToken;
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
