//! Background download of completed report artifacts.
//!
//! Runs off the request path so the webhook can acknowledge immediately.
//! Jobs are processed one at a time; the pre-signed links stay valid for
//! about 15 minutes, which the bounded queue keeps well within reach.

use std::path::PathBuf;

use surmado_client::ReportClient;
use surmado_core::ReportResult;
use tokio::sync::mpsc;

#[derive(Debug)]
pub struct DownloadJob {
    pub report_id: String,
    pub result: ReportResult,
}

/// Drains `jobs` until every sender is dropped.
///
/// A failed download is logged and the worker moves on to the next job.
pub async fn run_download_worker(
    client: ReportClient,
    dir: PathBuf,
    mut jobs: mpsc::Receiver<DownloadJob>,
) {
    tracing::info!(dir = %dir.display(), "download worker started");

    while let Some(job) = jobs.recv().await {
        match client
            .download_artifacts(&job.report_id, &job.result, &dir)
            .await
        {
            Ok(paths) => {
                tracing::info!(report_id = %job.report_id, files = paths.len(), "report artifacts saved");
            }
            Err(e) => {
                tracing::error!(report_id = %job.report_id, error = %e, "artifact download failed");
            }
        }
    }

    tracing::info!("download worker stopped");
}
