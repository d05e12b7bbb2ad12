//! Fixed-interval polling of a report until it reaches a terminal state.
//!
//! The wait is purely time-driven: a terminal state is only observed at the
//! next poll boundary. The delay between polls is cancellable through a
//! [`CancellationToken`] and never sleeps past the caller's deadline.

use std::time::Duration;

use surmado_core::{ReportResult, ReportStatus};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::ReportClient;
use crate::error::ClientError;

impl ReportClient {
    /// Polls `GET /reports/{report_id}` every poll interval until the report
    /// completes, fails, or `timeout` elapses.
    ///
    /// Elapsed time is checked before every poll, so a zero timeout fails
    /// without contacting the service.
    ///
    /// # Errors
    ///
    /// - [`ClientError::ReportFailed`] if the service reports `failed`.
    /// - [`ClientError::Timeout`] once `timeout` has elapsed.
    /// - Any error from [`ReportClient::get_report`].
    pub async fn wait_for_completion(
        &self,
        report_id: &str,
        timeout: Duration,
    ) -> Result<ReportResult, ClientError> {
        self.wait_for_completion_with_cancel(report_id, timeout, &CancellationToken::new())
            .await
    }

    /// Same as [`ReportClient::wait_for_completion`], but stops with
    /// [`ClientError::Cancelled`] as soon as `cancel` fires, including in the
    /// middle of a poll or a delay.
    ///
    /// # Errors
    ///
    /// See [`ReportClient::wait_for_completion`], plus
    /// [`ClientError::Cancelled`].
    pub async fn wait_for_completion_with_cancel(
        &self,
        report_id: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ReportResult, ClientError> {
        let started = Instant::now();
        let deadline = started.checked_add(timeout);
        let mut polls = 0u32;

        loop {
            if started.elapsed() >= timeout {
                return Err(timed_out(report_id, timeout, polls));
            }

            // An in-flight poll (retries included) is bounded by the same deadline.
            let poll = async {
                match deadline {
                    Some(deadline) => tokio::time::timeout_at(deadline, self.get_report(report_id))
                        .await
                        .unwrap_or_else(|_| Err(timed_out(report_id, timeout, polls))),
                    None => self.get_report(report_id).await,
                }
            };
            let snapshot = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(report_id)),
                snapshot = poll => snapshot?,
            };
            polls += 1;

            match snapshot.status {
                ReportStatus::Completed => {
                    tracing::info!(
                        report_id,
                        polls,
                        elapsed_secs = started.elapsed().as_secs(),
                        "report completed"
                    );
                    return Ok(snapshot.result);
                }
                ReportStatus::Failed => {
                    let error = snapshot
                        .result
                        .error
                        .unwrap_or_else(|| "Unknown error".to_owned());
                    tracing::warn!(report_id, polls, error = %error, "report failed");
                    return Err(ClientError::ReportFailed {
                        report_id: report_id.to_owned(),
                        error,
                    });
                }
                ref status => {
                    tracing::info!(report_id, polls, status = %status, "report not ready, waiting");
                }
            }

            let remaining = timeout.saturating_sub(started.elapsed());
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(cancelled(report_id)),
                () = tokio::time::sleep(self.poll_interval.min(remaining)) => {}
            }
        }
    }
}

fn timed_out(report_id: &str, timeout: Duration, polls: u32) -> ClientError {
    tracing::warn!(
        report_id,
        polls,
        timeout_secs = timeout.as_secs(),
        "report did not reach a terminal state in time"
    );
    ClientError::Timeout {
        report_id: report_id.to_owned(),
        timeout,
    }
}

fn cancelled(report_id: &str) -> ClientError {
    tracing::info!(report_id, "wait cancelled");
    ClientError::Cancelled {
        report_id: report_id.to_owned(),
    }
}
