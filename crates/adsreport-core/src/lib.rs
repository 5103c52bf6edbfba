pub mod app_config;
pub mod config;
pub mod dates;
pub mod format;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod narrative;
pub mod snapshot;

use thiserror::Error;

pub use app_config::{AppConfig, RunConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{DateRange, DateRangeError};
pub use ingest::Cell;
pub use metrics::{pct_change, rate, ratio, ChangeSet, MetricsComparison};
pub use model::{Client, PeriodMetrics, RunInput, WeekMetrics};
pub use narrative::{InsightCard, InsightKind, Narrative, Tone};
pub use snapshot::{load_snapshot, parse_snapshot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("missing required config key: {0}")]
    MissingKey(String),

    #[error("config validation failed: {0}")]
    Validation(String),

    #[error("failed to read snapshot file {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot file: {0}")]
    SnapshotParse(#[from] serde_yaml::Error),
}

/// Errors raised at the ingestion boundary, where raw cells become typed rows.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("date range is missing key '{0}'")]
    MissingDate(&'static str),

    #[error("unrecognized date for '{key}': {value:?}")]
    InvalidDate { key: &'static str, value: String },

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
