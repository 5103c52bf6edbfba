//! The weekly run: load input, then build and publish one report per active
//! client, then the index, then the summary email.
//!
//! Everything is sequential. The first failed publish or send aborts the run;
//! reports written before it stay published.

use std::path::{Path, PathBuf};

use adsreport_core::{AppConfig, MetricsComparison, Narrative, RunInput};
use adsreport_notify::{summary_message, ReportLink, SendGridMailer};
use adsreport_publish::{
    report_commit_message, report_path, GithubPublisher, INDEX_COMMIT_MESSAGE, INDEX_PATH,
};
use adsreport_render::{Branding, IndexRenderer, ReportInput, ReportRenderer};
use adsreport_sheets::SheetsClient;
use anyhow::Context;
use chrono::NaiveDate;

/// Base URLs of the three remote APIs; overridden in tests.
#[derive(Debug, Clone)]
pub(crate) struct ApiBases {
    pub(crate) sheets: String,
    pub(crate) github: String,
    pub(crate) sendgrid: String,
}

impl Default for ApiBases {
    fn default() -> Self {
        Self {
            sheets: adsreport_sheets::DEFAULT_BASE_URL.to_owned(),
            github: adsreport_publish::DEFAULT_BASE_URL.to_owned(),
            sendgrid: adsreport_notify::DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl ApiBases {
    #[cfg(test)]
    pub(crate) fn all(base_url: &str) -> Self {
        Self {
            sheets: base_url.to_owned(),
            github: base_url.to_owned(),
            sendgrid: base_url.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    pub(crate) dry_run: bool,
    pub(crate) out_dir: PathBuf,
    pub(crate) snapshot: Option<PathBuf>,
    pub(crate) skip_email: bool,
    pub(crate) generated_on: NaiveDate,
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub(crate) published: Vec<ReportLink>,
    /// Active clients with no current-week row.
    pub(crate) skipped: Vec<String>,
    pub(crate) emailed: bool,
}

/// Reads the run input from `snapshot` when given, else from the spreadsheet.
pub(crate) async fn load_input(
    config: &AppConfig,
    apis: &ApiBases,
    snapshot: Option<&Path>,
) -> anyhow::Result<RunInput> {
    if let Some(path) = snapshot {
        tracing::info!(path = %path.display(), "loading run input from snapshot");
        return adsreport_core::load_snapshot(path)
            .with_context(|| format!("loading snapshot {}", path.display()));
    }

    let sheets = SheetsClient::with_base_url(
        &config.spreadsheet_id,
        config.sheets_access_token.as_deref(),
        config.request_timeout_secs,
        &config.user_agent,
        &apis.sheets,
    )?;
    sheets
        .load_run_input()
        .await
        .context("loading run input from spreadsheet")
}

pub(crate) fn build_mailer(config: &AppConfig, apis: &ApiBases) -> anyhow::Result<SendGridMailer> {
    Ok(SendGridMailer::with_base_url(
        config.sendgrid_api_key.as_deref(),
        &config.email_from,
        &config.email_from_name,
        config.request_timeout_secs,
        &config.user_agent,
        &apis.sendgrid,
    )?)
}

/// Where finished documents go.
enum PublishTarget {
    Github(GithubPublisher),
    /// Dry run: plain files under this root, same relative paths.
    Directory(PathBuf),
}

impl PublishTarget {
    async fn write(&self, path: &str, document: &str, message: &str) -> anyhow::Result<()> {
        match self {
            Self::Github(publisher) => {
                let receipt = publisher.publish(path, document.as_bytes(), message).await?;
                tracing::info!(
                    path = %receipt.path,
                    created = receipt.created,
                    sha = %receipt.sha,
                    "published"
                );
            }
            Self::Directory(root) => {
                let dest = root.join(path);
                if let Some(parent) = dest.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                tokio::fs::write(&dest, document)
                    .await
                    .with_context(|| format!("writing {}", dest.display()))?;
                tracing::info!(path = %dest.display(), "wrote document (dry run)");
            }
        }
        Ok(())
    }
}

/// Runs one full weekly pass.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, a template fails to
/// render, or any publish or send step fails. Nothing after the failing
/// step runs.
pub(crate) async fn run_weekly(
    config: &AppConfig,
    apis: &ApiBases,
    options: &RunOptions,
) -> anyhow::Result<RunSummary> {
    let input = load_input(config, apis, options.snapshot.as_deref()).await?;
    let label = input.dates.current_label();
    let suffix = input.dates.folder_suffix();
    tracing::info!(
        dates = %label,
        clients = input.clients.len(),
        dry_run = options.dry_run,
        "starting weekly run"
    );

    let target = if options.dry_run {
        PublishTarget::Directory(options.out_dir.clone())
    } else {
        PublishTarget::Github(GithubPublisher::with_base_url(
            &input.config.github_token,
            &input.config.github_repo,
            &input.config.github_branch,
            config.request_timeout_secs,
            &config.user_agent,
            &apis.github,
        )?)
    };

    // A missing API key must fail before anything is published.
    let mailer = if options.dry_run || options.skip_email {
        None
    } else {
        Some(build_mailer(config, apis)?)
    };

    let branding = Branding::from_config(config);
    let reports = ReportRenderer::new(branding.clone(), config.report_id_prefix.clone());
    let mut summary = RunSummary::default();

    for client in input.active_clients() {
        let Some((current, previous)) = input.metrics_for(client) else {
            tracing::warn!(client = %client.name, "no current-week data; skipping");
            summary.skipped.push(client.name.clone());
            continue;
        };

        tracing::info!(client = %client.name, "building report");
        let comparison = MetricsComparison::new(current, previous);
        let narrative = Narrative::generate(&comparison);
        let rendered = reports.render(&ReportInput {
            client,
            comparison: &comparison,
            narrative: &narrative,
            dates: &input.dates,
            generated_on: options.generated_on,
        })?;
        tracing::debug!(
            client = %client.name,
            report_id = %rendered.report_id,
            tone = narrative.tone.as_str(),
            "rendered"
        );

        let folder = format!("{}-{suffix}", client.slug);
        target
            .write(&report_path(&folder), &rendered.html, &report_commit_message(&folder))
            .await
            .with_context(|| format!("publishing report for {}", client.name))?;

        summary.published.push(ReportLink {
            name: client.name.clone(),
            url: config.report_url(&folder),
        });
    }

    let index = IndexRenderer::new(branding).render(&input.clients, &input.dates)?;
    target
        .write(INDEX_PATH, &index, INDEX_COMMIT_MESSAGE)
        .await
        .context("publishing index")?;
    tracing::info!(reports = summary.published.len(), "index updated");

    let Some(mailer) = mailer else {
        tracing::info!("summary email not sent");
        return Ok(summary);
    };

    let message = summary_message(
        &input.config.email_to,
        input.config.email_bcc.as_deref(),
        &label,
        &config.portal_url(),
        &summary.published,
        &config.email_from_name,
    );
    mailer
        .send(&message)
        .await
        .context("sending summary email")?;
    tracing::info!(to = %message.to, bcc = ?message.bcc, "summary email sent");
    summary.emailed = true;

    Ok(summary)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
