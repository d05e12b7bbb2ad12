//! Report event handlers invoked by the webhook endpoint.
//!
//! Handlers run inside the request and must return quickly: the service
//! expects an answer within 30 seconds. Anything slow (downloading the
//! result files) goes onto the download queue and happens after the
//! acknowledgement.

use surmado_core::{ReportFailure, WebhookPayload};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::worker::DownloadJob;

const URL_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("download queue is full")]
    QueueFull,

    #[error("download worker is not running")]
    QueueClosed,
}

/// Receives terminal report events.
///
/// The same report may be delivered more than once; implementations must be
/// idempotent.
pub trait ReportEventHandler: Send + Sync + 'static {
    /// Called once per delivery with `status = completed`.
    ///
    /// # Errors
    ///
    /// An error is answered with HTTP 500 so the service redelivers.
    fn on_completed(&self, payload: &WebhookPayload) -> Result<(), HandlerError>;

    /// Called once per delivery with `status = failed`.
    ///
    /// # Errors
    ///
    /// An error is answered with HTTP 500 so the service redelivers.
    fn on_failed(&self, failure: &ReportFailure) -> Result<(), HandlerError>;
}

/// Default handler: logs every event and, when a download queue is attached,
/// hands completed reports to the download worker.
pub struct NotifyingHandler {
    downloads: Option<mpsc::Sender<DownloadJob>>,
}

impl NotifyingHandler {
    #[must_use]
    pub fn log_only() -> Self {
        Self { downloads: None }
    }

    #[must_use]
    pub fn with_downloads(downloads: mpsc::Sender<DownloadJob>) -> Self {
        Self {
            downloads: Some(downloads),
        }
    }
}

impl ReportEventHandler for NotifyingHandler {
    fn on_completed(&self, payload: &WebhookPayload) -> Result<(), HandlerError> {
        let artifacts = payload.result.artifacts();
        tracing::info!(
            report_id = %payload.report_id,
            product = payload.product_label(),
            brand = payload.brand_name.as_deref().unwrap_or(""),
            artifacts = artifacts.len(),
            "report completed"
        );
        for artifact in &artifacts {
            tracing::info!(
                report_id = %payload.report_id,
                kind = artifact.kind.label(),
                url = %preview(artifact.url),
                "artifact available"
            );
        }

        let Some(downloads) = &self.downloads else {
            return Ok(());
        };
        if artifacts.is_empty() {
            return Ok(());
        }

        downloads
            .try_send(DownloadJob {
                report_id: payload.report_id.clone(),
                result: payload.result.clone(),
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => HandlerError::QueueFull,
                TrySendError::Closed(_) => HandlerError::QueueClosed,
            })
    }

    fn on_failed(&self, failure: &ReportFailure) -> Result<(), HandlerError> {
        tracing::warn!(
            report_id = %failure.report_id,
            error = %failure.error,
            "report failed"
        );
        Ok(())
    }
}

/// First 80 characters of a pre-signed URL; the signature tail is noise in logs.
fn preview(url: &str) -> String {
    match url.char_indices().nth(URL_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &url[..cut]),
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use surmado_core::{ReportResult, ReportStatus};

    use super::*;

    fn completed(download_url: Option<&str>) -> WebhookPayload {
        WebhookPayload {
            report_id: "rpt_1".to_owned(),
            status: ReportStatus::Completed,
            product: None,
            brand_slug: None,
            brand_name: None,
            result: ReportResult {
                download_url: download_url.map(str::to_owned),
                ..ReportResult::default()
            },
        }
    }

    #[test]
    fn preview_truncates_long_urls() {
        let url = format!("https://files.example/{}", "a".repeat(200));
        let shown = preview(&url);
        assert_eq!(shown.chars().count(), URL_PREVIEW_CHARS + 3);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn preview_keeps_short_urls() {
        assert_eq!(preview("https://x/y"), "https://x/y");
    }

    #[test]
    fn log_only_handler_accepts_events() {
        let handler = NotifyingHandler::log_only();
        assert!(handler.on_completed(&completed(Some("https://x/y"))).is_ok());
        assert!(handler
            .on_failed(&ReportFailure {
                report_id: "rpt_2".to_owned(),
                error: "boom".to_owned(),
            })
            .is_ok());
    }

    #[tokio::test]
    async fn completed_report_is_queued_for_download() {
        let (tx, mut rx) = mpsc::channel(1);
        let handler = NotifyingHandler::with_downloads(tx);

        handler.on_completed(&completed(Some("https://x/y"))).unwrap();

        let job = rx.recv().await.expect("job queued");
        assert_eq!(job.report_id, "rpt_1");
        assert_eq!(job.result.download_url.as_deref(), Some("https://x/y"));
    }

    #[tokio::test]
    async fn completed_report_without_links_is_not_queued() {
        let (tx, mut rx) = mpsc::channel(1);
        let handler = NotifyingHandler::with_downloads(tx);

        handler.on_completed(&completed(None)).unwrap();
        drop(handler);

        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn full_queue_is_reported() {
        let (tx, _rx) = mpsc::channel(1);
        let handler = NotifyingHandler::with_downloads(tx);

        handler.on_completed(&completed(Some("https://x/1"))).unwrap();
        let err = handler.on_completed(&completed(Some("https://x/2"))).unwrap_err();
        assert!(matches!(err, HandlerError::QueueFull));
    }

    #[test]
    fn closed_queue_is_reported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handler = NotifyingHandler::with_downloads(tx);

        let err = handler.on_completed(&completed(Some("https://x/1"))).unwrap_err();
        assert!(matches!(err, HandlerError::QueueClosed));
    }
}
