use thiserror::Error;

/// Errors returned while sending notification mail.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SENDGRID_API_KEY is not set")]
    MissingApiKey,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid mail API base URL: {0}")]
    InvalidBaseUrl(String),

    /// The mail API refused the message.
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },
}
