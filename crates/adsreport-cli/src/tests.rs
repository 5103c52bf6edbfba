use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["adsreport"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn run_defaults() {
    let cli = Cli::try_parse_from(["adsreport", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            dry_run: false,
            ref out_dir,
            snapshot: None,
            skip_email: false,
        }) if out_dir == &PathBuf::from("out")
    ));
}

#[test]
fn run_dry_run_with_snapshot_and_out_dir() {
    let cli = Cli::try_parse_from([
        "adsreport",
        "run",
        "--dry-run",
        "--snapshot",
        "week.yaml",
        "--out-dir",
        "/tmp/reports",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            dry_run: true,
            ref out_dir,
            snapshot: Some(ref s),
            skip_email: false,
        }) if out_dir == &PathBuf::from("/tmp/reports") && s == &PathBuf::from("week.yaml")
    ));
}

#[test]
fn run_skip_email() {
    let cli = Cli::try_parse_from(["adsreport", "run", "--skip-email"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Run {
            skip_email: true,
            dry_run: false,
            ..
        })
    ));
}

#[test]
fn dates_parses_today() {
    let cli = Cli::try_parse_from(["adsreport", "dates", "--today", "2026-01-11"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Dates { today: Some(d) }) if d == NaiveDate::from_ymd_opt(2026, 1, 11).unwrap()
    ));
}

#[test]
fn dates_rejects_malformed_today() {
    assert!(Cli::try_parse_from(["adsreport", "dates", "--today", "1/11/2026"]).is_err());
}

#[test]
fn test_email_is_kebab_case() {
    let cli = Cli::try_parse_from(["adsreport", "test-email"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::TestEmail { snapshot: None })
    ));
}

#[test]
fn preview_requires_client() {
    assert!(Cli::try_parse_from(["adsreport", "preview"]).is_err());

    let cli = Cli::try_parse_from(["adsreport", "preview", "--client", "acme"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Preview { ref client, snapshot: None }) if client == "acme"
    ));
}

#[test]
fn dates_report_for_a_sunday() {
    let report = commands::dates_report(NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
    assert_eq!(
        report,
        "this week:     January 4, 2026 \u{2013} January 10, 2026\n\
         previous week: December 28, 2025 \u{2013} January 3, 2026\n\
         folder suffix: jan4-10\n\
         ISO week:      2026-W02"
    );
}

#[test]
fn dates_report_across_a_month_boundary() {
    let report = commands::dates_report(NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    assert!(report.contains("folder suffix: dec28-jan3"), "{report}");
    assert!(report.contains("ISO week:      2026-W01"), "{report}");
}
