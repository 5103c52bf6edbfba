//! Handlers for the smaller subcommands: `dates`, `test-email` and `preview`.

use std::path::Path;

use adsreport_core::format::report_id;
use adsreport_core::{AppConfig, DateRange, MetricsComparison, Narrative, RunConfig};
use adsreport_notify::test_message;
use adsreport_sheets::SheetsClient;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use crate::run::{build_mailer, load_input, ApiBases};

pub(crate) fn dates_report(today: NaiveDate) -> String {
    let dates = DateRange::ending_yesterday(today);
    let (year, week) = dates.iso_week();
    format!(
        "this week:     {}\nprevious week: {}\nfolder suffix: {}\nISO week:      {year}-W{week:02}",
        dates.current_label(),
        dates.previous_label(),
        dates.folder_suffix(),
    )
}

pub(crate) fn print_dates(today: NaiveDate) {
    println!("{}", dates_report(today));
}

async fn load_run_config(
    config: &AppConfig,
    apis: &ApiBases,
    snapshot: Option<&Path>,
) -> anyhow::Result<RunConfig> {
    if let Some(path) = snapshot {
        return Ok(adsreport_core::load_snapshot(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?
            .config);
    }
    let sheets = SheetsClient::with_base_url(
        &config.spreadsheet_id,
        config.sheets_access_token.as_deref(),
        config.request_timeout_secs,
        &config.user_agent,
        &apis.sheets,
    )?;
    Ok(sheets.load_run_config().await?)
}

/// Sends the fixed test message to the BCC recipient, or the primary one
/// when no BCC is configured. Returns the address used.
pub(crate) async fn send_test_email(
    config: &AppConfig,
    apis: &ApiBases,
    snapshot: Option<&Path>,
) -> anyhow::Result<String> {
    let run_config = load_run_config(config, apis, snapshot).await?;
    let recipient = run_config.email_bcc.unwrap_or(run_config.email_to);

    build_mailer(config, apis)?
        .send(&test_message(&recipient))
        .await
        .context("sending test email")?;
    tracing::info!(to = %recipient, "test email sent");
    Ok(recipient)
}

#[derive(Debug, Serialize)]
struct Preview<'a> {
    client: &'a str,
    report_id: String,
    dates: String,
    #[serde(flatten)]
    comparison: &'a MetricsComparison,
    narrative: &'a Narrative,
}

/// One client's metrics and narrative as pretty-printed JSON.
pub(crate) async fn preview(
    config: &AppConfig,
    apis: &ApiBases,
    slug: &str,
    snapshot: Option<&Path>,
) -> anyhow::Result<String> {
    let input = load_input(config, apis, snapshot).await?;
    let client = input
        .clients
        .iter()
        .find(|c| c.slug.eq_ignore_ascii_case(slug))
        .ok_or_else(|| anyhow::anyhow!("client '{slug}' not found"))?;
    let (current, previous) = input
        .metrics_for(client)
        .ok_or_else(|| anyhow::anyhow!("client '{slug}' has no current-week data"))?;

    let comparison = MetricsComparison::new(current, previous);
    let narrative = Narrative::generate(&comparison);
    tracing::debug!(client = %client.name, tone = narrative.tone.as_str(), "previewing");

    let preview = Preview {
        client: &client.name,
        report_id: report_id(&client.slug, &input.dates, config.report_id_prefix.as_deref()),
        dates: input.dates.current_label(),
        comparison: &comparison,
        narrative: &narrative,
    };
    Ok(serde_json::to_string_pretty(&preview)?)
}
