//! HTTP client for the Google Sheets values API.
//!
//! Each tab is fetched with unformatted values so numbers arrive as numbers,
//! while dates arrive as the strings the sheet displays. Typed parsing is
//! delegated to `adsreport_core::ingest`.

use std::time::Duration;

use adsreport_core::ingest::{
    parse_client_rows, parse_date_range, parse_key_values, parse_metric_rows, Cell,
};
use adsreport_core::{RunConfig, RunInput};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SheetsError;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/";

/// The tabs a weekly run reads, in the order they are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Config,
    Clients,
    DateRange,
    ThisWeek,
    PreviousWeek,
}

impl Tab {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Tab::Config => "Config",
            Tab::Clients => "Clients",
            Tab::DateRange => "Date Range",
            Tab::ThisWeek => "This Week",
            Tab::PreviousWeek => "Previous Week",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Cell>>,
}

/// Read-only client for one spreadsheet.
///
/// Use [`SheetsClient::new`] for production or
/// [`SheetsClient::with_base_url`] to point at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: Option<String>,
}

impl SheetsClient {
    /// Creates a client pointed at the production Sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        spreadsheet_id: &str,
        access_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SheetsError> {
        Self::with_base_url(
            spreadsheet_id,
            access_token,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SheetsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        spreadsheet_id: &str,
        access_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SheetsError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: spreadsheet_id.to_owned(),
            access_token: access_token.map(str::to_owned),
        })
    }

    /// Loads everything a run needs: config, clients, dates and both weeks
    /// of metrics.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if any tab cannot be fetched or decoded, or
    /// [`SheetsError::Ingest`] if the config or dates are invalid.
    pub async fn load_run_input(&self) -> Result<RunInput, SheetsError> {
        let config = self.load_run_config().await?;
        let clients = parse_client_rows(&self.read_tab(Tab::Clients).await?);
        let dates = parse_date_range(&parse_key_values(&self.read_tab(Tab::DateRange).await?))?;
        let this_week = parse_metric_rows(&self.read_tab(Tab::ThisWeek).await?);
        let previous_week = parse_metric_rows(&self.read_tab(Tab::PreviousWeek).await?);

        tracing::debug!(
            clients = clients.len(),
            this_week_rows = this_week.len(),
            previous_week_rows = previous_week.len(),
            "loaded run input from spreadsheet"
        );

        Ok(RunInput {
            config,
            clients,
            dates,
            this_week,
            previous_week,
        })
    }

    /// Reads only the `Config` tab.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the tab cannot be fetched, or
    /// [`SheetsError::Ingest`] if a required key is missing.
    pub async fn load_run_config(&self) -> Result<RunConfig, SheetsError> {
        let pairs = parse_key_values(&self.read_tab(Tab::Config).await?);
        RunConfig::from_pairs(&pairs).map_err(|e| SheetsError::Ingest(e.into()))
    }

    /// Fetches every populated row of one tab.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SheetsError::Deserialize`] if the body is not a value range.
    pub async fn read_tab(&self, tab: Tab) -> Result<Vec<Vec<Cell>>, SheetsError> {
        let url = self.tab_url(tab)?;
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: format!("values({})", tab.title()),
                source: e,
            })?;
        Ok(range.values)
    }

    fn tab_url(&self, tab: Tab) -> Result<Url, SheetsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", tab.title()]);
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
            .append_pair("dateTimeRenderOption", "FORMATTED_STRING");
        Ok(url)
    }
}
