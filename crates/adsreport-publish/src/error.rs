use thiserror::Error;

/// Errors returned by the content-store publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid publish target: {0}")]
    InvalidTarget(String),

    /// The write was rejected.
    #[error("unexpected status {status} writing {path}: {body}")]
    UnexpectedStatus {
        status: u16,
        path: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
