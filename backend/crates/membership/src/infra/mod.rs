//! Infrastructure Layer
//!
//! Database and mail implementations.

pub mod mailer;
pub mod memory;
pub mod postgres;
#[cfg(feature = "smtp")]
pub mod smtp;

pub use mailer::{LogMailer, OperatorMailer, RecordingMailer};
pub use memory::InMemoryContactRepository;
pub use postgres::PgContactRepository;
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;
