use std::time::Duration;

use surmado_client::{CancellationToken, ReportClient};
use surmado_core::ReportResult;

use super::WaitArgs;

/// Print one status snapshot as JSON.
///
/// # Errors
///
/// Returns an error if the report cannot be fetched.
pub(crate) async fn run_get(client: &ReportClient, report_id: &str) -> anyhow::Result<()> {
    let snapshot = client.get_report(report_id).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Wait for an existing report to finish.
///
/// # Errors
///
/// See [`wait_and_report`].
pub(crate) async fn run_wait(
    client: &ReportClient,
    report_id: &str,
    args: &WaitArgs,
    default_timeout: Duration,
) -> anyhow::Result<()> {
    wait_and_report(client, report_id, args, default_timeout).await
}

/// Poll until the report completes, then print its links and optionally
/// download the files. Ctrl-C stops the wait.
///
/// # Errors
///
/// Returns an error if the report failed, the wait timed out or was
/// cancelled, or a download failed.
pub(super) async fn wait_and_report(
    client: &ReportClient,
    report_id: &str,
    args: &WaitArgs,
    default_timeout: Duration,
) -> anyhow::Result<()> {
    let timeout = args
        .timeout_mins
        .map_or(default_timeout, timeout_from_mins);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("ctrl-c received, cancelling wait");
            on_ctrl_c.cancel();
        }
    });

    println!(
        "waiting for {report_id} (checking every {}s, up to {}m)...",
        client.poll_interval().as_secs(),
        timeout.as_secs() / 60
    );
    tracing::debug!(report_id, timeout_secs = timeout.as_secs(), "waiting for report");
    let outcome = client
        .wait_for_completion_with_cancel(report_id, timeout, &cancel)
        .await;
    watcher.abort();
    let result = outcome?;

    println!("report {report_id} completed");
    for line in artifact_lines(&result) {
        println!("{line}");
    }
    println!("download links expire about 15 minutes after completion");

    if let Some(dir) = &args.download_dir {
        let paths = client.download_artifacts(report_id, &result, dir).await?;
        tracing::info!(report_id, files = paths.len(), dir = %dir.display(), "report files saved");
        for path in paths {
            println!("saved {}", path.display());
        }
    }

    Ok(())
}

fn timeout_from_mins(mins: u64) -> Duration {
    Duration::from_secs(mins.saturating_mul(60))
}

/// `PDF: <url>` style lines for each link the report carries.
fn artifact_lines(result: &ReportResult) -> Vec<String> {
    result
        .artifacts()
        .iter()
        .map(|a| format!("{}: {}", a.kind.label(), a.url))
        .collect()
}
