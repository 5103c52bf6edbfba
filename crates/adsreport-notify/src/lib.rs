//! Stakeholder email for a finished weekly run.

pub mod error;
pub mod mailer;
pub mod message;

pub use error::NotifyError;
pub use mailer::{SendGridMailer, DEFAULT_BASE_URL};
pub use message::{summary_message, test_message, Message, ReportLink};
