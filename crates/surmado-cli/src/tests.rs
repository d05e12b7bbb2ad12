use surmado_core::{Product, Tier};

use super::*;

#[test]
fn parses_scan_with_default_tier() {
    let cli = Cli::try_parse_from([
        "surmado-cli",
        "scan",
        "--url",
        "https://example.com",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
    ])
    .expect("expected valid cli args");

    let Commands::Scan(args) = cli.command else {
        panic!("expected scan command");
    };
    let (request, submit) = args.into_parts();
    assert_eq!(request.tier, Tier::Basic);
    assert_eq!(request.url, "https://example.com");
    assert!(!submit.no_wait);
    assert!(submit.wait.timeout_mins.is_none());
    assert!(submit.wait.download_dir.is_none());
}

#[test]
fn parses_scan_premium_no_wait() {
    let cli = Cli::try_parse_from([
        "surmado-cli",
        "scan",
        "--url",
        "https://example.com",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
        "--tier",
        "premium",
        "--no-wait",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Scan(ScanArgs {
            tier: Tier::Premium,
            ..
        })
    ));
    let Commands::Scan(args) = cli.command else {
        unreachable!()
    };
    assert!(args.submit.no_wait);
}

#[test]
fn rejects_unknown_tier() {
    let result = Cli::try_parse_from([
        "surmado-cli",
        "scan",
        "--url",
        "https://example.com",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
        "--tier",
        "gold",
    ]);
    assert!(result.is_err());
}

#[test]
fn scan_requires_url() {
    let result = Cli::try_parse_from([
        "surmado-cli",
        "scan",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_signal_into_request() {
    let cli = Cli::try_parse_from([
        "surmado-cli",
        "signal",
        "--url",
        "https://example.com",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
        "--industry",
        "Coffee",
        "--location",
        "Portland, OR",
        "--persona",
        "Remote workers",
        "--pain-points",
        "Low visibility",
        "--brand-details",
        "Roaster since 2010",
        "--direct-competitors",
        "A, B",
        "--tier",
        "pro",
        "--timeout-mins",
        "5",
    ])
    .expect("expected valid cli args");

    let Commands::Signal(args) = cli.command else {
        panic!("expected signal command");
    };
    let (request, submit) = args.into_parts();
    let request = ReportRequest::from(request);
    assert_eq!(request.product(), Product::Signal);
    assert_eq!(request.tier(), Tier::Pro);
    assert!(request.validate().is_ok());
    assert_eq!(submit.wait.timeout_mins, Some(5));
}

#[test]
fn parses_solutions_as_pro() {
    let cli = Cli::try_parse_from([
        "surmado-cli",
        "solutions",
        "--brand-name",
        "Example",
        "--email",
        "ops@example.com",
        "--business-story",
        "Family bakery",
        "--decision",
        "Open a second shop",
        "--success",
        "Break even in a year",
        "--timeline",
        "6 months",
        "--scale-indicator",
        "12 staff",
        "--download-dir",
        "/tmp/reports",
    ])
    .expect("expected valid cli args");

    let Commands::Solutions(args) = cli.command else {
        panic!("expected solutions command");
    };
    let (request, submit) = args.into_parts();
    let request = ReportRequest::from(request);
    assert_eq!(request.product(), Product::Solutions);
    assert_eq!(request.tier(), Tier::Pro);
    assert_eq!(
        submit.wait.download_dir.as_deref(),
        Some(std::path::Path::new("/tmp/reports"))
    );
}

#[test]
fn parses_get_command() {
    let cli = Cli::try_parse_from(["surmado-cli", "get", "rpt_abc123"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Get { ref report_id } if report_id == "rpt_abc123"
    ));
}

#[test]
fn parses_wait_command_with_options() {
    let cli = Cli::try_parse_from([
        "surmado-cli",
        "wait",
        "rpt_abc123",
        "--timeout-mins",
        "30",
    ])
    .expect("expected valid cli args");

    let Commands::Wait { report_id, wait } = cli.command else {
        panic!("expected wait command");
    };
    assert_eq!(report_id, "rpt_abc123");
    assert_eq!(wait.timeout_mins, Some(30));
}

#[test]
fn wait_does_not_accept_no_wait() {
    let result = Cli::try_parse_from(["surmado-cli", "wait", "rpt_abc123", "--no-wait"]);
    assert!(result.is_err());
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["surmado-cli"]).is_err());
}
