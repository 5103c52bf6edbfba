use std::collections::BTreeMap;

use crate::app_config::{AppConfig, RunConfig};
use crate::ConfigError;

/// Reads `ADSREPORT_*` and credential variables, after merging a `.env` file
/// if one is present.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] when the spreadsheet id or reports
/// base URL is unset, and [`ConfigError::InvalidEnvVar`] for a non-http base
/// URL or a non-numeric timeout.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Blank values count as unset.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let spreadsheet_id = require("ADSREPORT_SPREADSHEET_ID")?;
    let reports_base_url = require("ADSREPORT_REPORTS_BASE_URL")?;
    if !reports_base_url.starts_with("http://") && !reports_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADSREPORT_REPORTS_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{reports_base_url}'"),
        });
    }
    let reports_base_url = reports_base_url.trim_end_matches('/').to_string();

    let sheets_access_token = optional("GOOGLE_SHEETS_ACCESS_TOKEN");
    let sendgrid_api_key = optional("SENDGRID_API_KEY");
    let email_from = or_default("ADSREPORT_EMAIL_FROM", "reports@localhost");
    let email_from_name = or_default("ADSREPORT_EMAIL_FROM_NAME", "Weekly Reports");
    let agency_name = or_default("ADSREPORT_AGENCY_NAME", "Performance Reports");
    let agency_url = or_default("ADSREPORT_AGENCY_URL", &reports_base_url);
    let report_id_prefix = optional("ADSREPORT_REPORT_ID_PREFIX");
    let log_level = or_default("ADSREPORT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("ADSREPORT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ADSREPORT_USER_AGENT", "adsreport/0.1 (weekly-reporting)");

    Ok(AppConfig {
        spreadsheet_id,
        sheets_access_token,
        sendgrid_api_key,
        email_from,
        email_from_name,
        reports_base_url,
        agency_name,
        agency_url,
        report_id_prefix,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

impl RunConfig {
    /// Builds the run configuration from the `Config` tab's key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when `github_token`, `github_repo`
    /// or `email_to` is absent, and [`ConfigError::Validation`] when
    /// `github_repo` is not of the form `owner/name`.
    pub fn from_pairs(pairs: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| pairs.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key)
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
        };

        let github_token = require("github_token")?;
        let github_repo = require("github_repo")?;
        let mut parts = github_repo.split('/');
        let valid = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !valid {
            return Err(ConfigError::Validation(format!(
                "github_repo must be 'owner/name', got '{github_repo}'"
            )));
        }

        Ok(Self {
            github_token,
            github_repo,
            github_branch: get("github_branch").unwrap_or("main").to_string(),
            email_to: require("email_to")?,
            email_bcc: get("email_bcc").map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
