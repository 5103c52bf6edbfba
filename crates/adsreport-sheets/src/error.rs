use adsreport_core::IngestError;
use thiserror::Error;

/// Errors returned while reading run input from the spreadsheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid Sheets base URL: {0}")]
    InvalidBaseUrl(String),

    /// The values endpoint answered with a non-2xx status.
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The cells were read but do not describe a valid run.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}
