//! SendGrid v3 mail client.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::NotifyError;
use crate::message::Message;

pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com/";

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailSend<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

impl<'a> MailSend<'a> {
    fn plain_text(message: &'a Message, from_email: &'a str, from_name: &'a str) -> Self {
        let address = |email: &'a str| Address { email, name: None };
        Self {
            personalizations: vec![Personalization {
                to: vec![address(message.to.as_str())],
                bcc: message.bcc.as_deref().map(address).into_iter().collect(),
            }],
            from: Address {
                email: from_email,
                name: Some(from_name),
            },
            subject: &message.subject,
            content: vec![Content {
                kind: "text/plain",
                value: &message.body,
            }],
        }
    }
}

/// Sends plain-text mail through the SendGrid `mail/send` endpoint.
///
/// Use [`SendGridMailer::new`] for production or
/// [`SendGridMailer::with_base_url`] to point at a mock server in tests.
pub struct SendGridMailer {
    client: Client,
    base_url: Url,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl SendGridMailer {
    /// Creates a mailer pointed at the production SendGrid API.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::MissingApiKey`] when `api_key` is `None` or
    /// blank, and [`NotifyError::Http`] if the `reqwest::Client` cannot be
    /// built.
    pub fn new(
        api_key: Option<&str>,
        from_email: &str,
        from_name: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, NotifyError> {
        Self::with_base_url(
            api_key,
            from_email,
            from_name,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a mailer with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`SendGridMailer::new`], plus [`NotifyError::InvalidBaseUrl`].
    pub fn with_base_url(
        api_key: Option<&str>,
        from_email: &str,
        from_name: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, NotifyError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(NotifyError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| NotifyError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            from_email: from_email.to_owned(),
            from_name: from_name.to_owned(),
        })
    }

    /// Sends `message`.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::Http`] on network failure.
    /// - [`NotifyError::UnexpectedStatus`] on any non-2xx response.
    pub async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let url = self
            .base_url
            .join("v3/mail/send")
            .map_err(|e| NotifyError::InvalidBaseUrl(e.to_string()))?;
        let payload = MailSend::plain_text(message, &self.from_email, &self.from_name);

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        tracing::debug!(to = %message.to, bcc = ?message.bcc, status = %status, "mail accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_key_is_rejected() {
        for key in [None, Some(""), Some("   ")] {
            let result = SendGridMailer::new(key, "from@example.com", "Reports", 30, "test");
            assert!(matches!(result, Err(NotifyError::MissingApiKey)));
        }
    }

    #[test]
    fn payload_shape() {
        let message = Message::new(
            "owner@example.com",
            Some("archive@example.com"),
            "Subject".into(),
            "Body".into(),
        );
        let payload =
            serde_json::to_value(MailSend::plain_text(&message, "from@example.com", "Reports"))
                .unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "personalizations": [{
                    "to": [{ "email": "owner@example.com" }],
                    "bcc": [{ "email": "archive@example.com" }]
                }],
                "from": { "email": "from@example.com", "name": "Reports" },
                "subject": "Subject",
                "content": [{ "type": "text/plain", "value": "Body" }]
            })
        );
    }

    #[test]
    fn payload_without_bcc_omits_the_field() {
        let message = Message::new("owner@example.com", None, "S".into(), "B".into());
        let payload =
            serde_json::to_value(MailSend::plain_text(&message, "f@example.com", "R")).unwrap();
        assert!(payload["personalizations"][0].get("bcc").is_none());
    }
}
