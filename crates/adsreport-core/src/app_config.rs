/// Process-level settings read once from the environment at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    pub sheets_access_token: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub email_from: String,
    pub email_from_name: String,
    pub reports_base_url: String,
    pub agency_name: String,
    pub agency_url: String,
    pub report_id_prefix: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Public URL of a published folder: `{base}/{folder}/`.
    #[must_use]
    pub fn report_url(&self, folder: &str) -> String {
        format!("{}/{folder}/", self.reports_base_url.trim_end_matches('/'))
    }

    /// Public URL of the landing page.
    #[must_use]
    pub fn portal_url(&self) -> String {
        format!("{}/", self.reports_base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field(
                "sheets_access_token",
                &self.sheets_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "sendgrid_api_key",
                &self.sendgrid_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("email_from", &self.email_from)
            .field("email_from_name", &self.email_from_name)
            .field("reports_base_url", &self.reports_base_url)
            .field("agency_name", &self.agency_name)
            .field("agency_url", &self.agency_url)
            .field("report_id_prefix", &self.report_id_prefix)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Per-run settings from the spreadsheet `Config` tab: publish target and
/// notification recipients.
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub github_token: String,
    pub github_repo: String,
    pub github_branch: String,
    pub email_to: String,
    pub email_bcc: Option<String>,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("github_token", &"[redacted]")
            .field("github_repo", &self.github_repo)
            .field("github_branch", &self.github_branch)
            .field("email_to", &self.email_to)
            .field("email_bcc", &self.email_bcc)
            .finish()
    }
}
