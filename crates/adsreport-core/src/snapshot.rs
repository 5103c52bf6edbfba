//! YAML snapshot of one run's input, for offline and manual runs.
//!
//! Values go through the same [`Cell`] coercions as spreadsheet cells, so a
//! snapshot and a live spreadsheet with the same content produce the same
//! [`RunInput`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::app_config::RunConfig;
use crate::ingest::{parse_date_range, with_valid_slug, Cell};
use crate::model::{Client, PeriodMetrics, RunInput, WeekMetrics};
use crate::{ConfigError, IngestError};

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    config: BTreeMap<String, Cell>,
    #[serde(default)]
    clients: Vec<SnapshotClient>,
    dates: BTreeMap<String, Cell>,
    #[serde(default)]
    this_week: Vec<SnapshotRow>,
    #[serde(default)]
    previous_week: Vec<SnapshotRow>,
}

#[derive(Debug, Deserialize)]
struct SnapshotClient {
    name: String,
    slug: String,
    #[serde(default)]
    account_id: Cell,
    #[serde(default)]
    active: Cell,
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    client: String,
    #[serde(default)]
    spend: Cell,
    #[serde(default)]
    impressions: Cell,
    #[serde(default)]
    clicks: Cell,
}

/// Reads and validates a snapshot file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read or parsed, the run
/// configuration is incomplete, or the dates are not two contiguous weeks.
pub fn load_snapshot(path: &Path) -> Result<RunInput, IngestError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SnapshotIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&raw)
}

/// Parses snapshot YAML already in memory.
///
/// # Errors
///
/// Same as [`load_snapshot`], minus the file read.
pub fn parse_snapshot(yaml: &str) -> Result<RunInput, IngestError> {
    let file: SnapshotFile = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;

    let config = RunConfig::from_pairs(&text_map(&file.config))?;
    let dates = parse_date_range(&text_map(&file.dates))?;
    let clients = file
        .clients
        .into_iter()
        .map(|c| Client {
            name: c.name.trim().to_string(),
            slug: c.slug.trim().to_string(),
            account_id: c.account_id.as_text(),
            active: c.active.as_flag(),
        })
        .filter_map(with_valid_slug)
        .collect();

    Ok(RunInput {
        config,
        clients,
        dates,
        this_week: week(&file.this_week),
        previous_week: week(&file.previous_week),
    })
}

fn text_map(values: &BTreeMap<String, Cell>) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(k, v)| (k.trim().to_string(), v.as_text()))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .collect()
}

fn week(rows: &[SnapshotRow]) -> WeekMetrics {
    rows.iter()
        .map(|r| {
            (
                r.client.trim().to_string(),
                PeriodMetrics::new(r.spend.as_money(), r.impressions.as_count(), r.clicks.as_count()),
            )
        })
        .collect()
}
