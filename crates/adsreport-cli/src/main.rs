use std::path::PathBuf;

use adsreport_core::AppConfig;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod run;

use run::{ApiBases, RunOptions};

#[derive(Debug, Parser)]
#[command(name = "adsreport")]
#[command(about = "Weekly ads performance reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build, publish and announce this week's reports
    Run {
        /// Write documents under --out-dir instead of publishing; never sends mail
        #[arg(long)]
        dry_run: bool,

        /// Destination for dry-run documents
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Read the run input from a YAML snapshot instead of the spreadsheet
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Publish but do not send the summary email
        #[arg(long)]
        skip_email: bool,
    },
    /// Print the reporting windows the weekly export would use
    Dates {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Send a one-line message to check mail delivery
    TestEmail {
        /// Read recipients from a YAML snapshot instead of the spreadsheet
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Print one client's metrics and narrative as JSON
    Preview {
        /// Client slug
        #[arg(long)]
        client: String,

        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

/// Loads the process config and installs the log subscriber.
fn setup() -> anyhow::Result<AppConfig> {
    let config = adsreport_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(config)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let apis = ApiBases::default();

    match cli.command {
        Some(Commands::Run {
            dry_run,
            out_dir,
            snapshot,
            skip_email,
        }) => {
            let config = setup()?;
            let options = RunOptions {
                dry_run,
                out_dir,
                snapshot,
                skip_email,
                generated_on: today(),
            };
            let summary = run::run_weekly(&config, &apis, &options).await?;
            for link in &summary.published {
                println!("{}: {}", link.name, link.url);
            }
            for name in &summary.skipped {
                println!("skipped {name}: no current-week data");
            }
        }
        Some(Commands::Dates { today: day }) => {
            commands::print_dates(day.unwrap_or_else(today));
        }
        Some(Commands::TestEmail { snapshot }) => {
            let config = setup()?;
            let recipient = commands::send_test_email(&config, &apis, snapshot.as_deref()).await?;
            println!("test email sent to {recipient}");
        }
        Some(Commands::Preview { client, snapshot }) => {
            let config = setup()?;
            let json = commands::preview(&config, &apis, &client, snapshot.as_deref()).await?;
            println!("{json}");
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
