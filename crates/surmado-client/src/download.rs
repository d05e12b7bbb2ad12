//! Fetching report artifacts from their pre-signed download links.

use std::path::{Path, PathBuf};

use surmado_core::ReportResult;

use crate::client::ReportClient;
use crate::error::ClientError;
use crate::retry::{is_transient, retry_with_backoff};

impl ReportClient {
    /// Downloads one pre-signed URL to `dest`, returning the bytes written.
    ///
    /// The API key is never sent: the link authenticates itself. The body is
    /// written to a `.part` sibling first and renamed into place, so `dest`
    /// only ever holds a complete file.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx response (HTTP 403 usually means
    ///   the link expired).
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Io`] if the file cannot be written.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, ClientError> {
        let bytes = retry_with_backoff(self.max_retries, self.backoff_base_ms, is_transient, || {
            async move {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    let text = response.text().await.unwrap_or_default();
                    if status == reqwest::StatusCode::FORBIDDEN {
                        tracing::warn!(
                            "download link rejected; pre-signed links expire about 15 minutes after issue"
                        );
                    }
                    return Err(ClientError::Api {
                        status: status.as_u16(),
                        body: serde_json::from_str(&text).ok(),
                    });
                }
                Ok(response.bytes().await?)
            }
        })
        .await?;

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ClientError::Io { path, source }
        };

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_err(parent))?;
        }

        let mut partial = dest.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        tokio::fs::write(&partial, &bytes)
            .await
            .map_err(io_err(&partial))?;
        tokio::fs::rename(&partial, dest)
            .await
            .map_err(io_err(dest))?;

        Ok(bytes.len() as u64)
    }

    /// Downloads every artifact of a completed report into `dir` as
    /// `{report_id}.{pdf,pptx,json}` and returns the local paths.
    ///
    /// Files already present are left untouched and still returned, which
    /// keeps repeated deliveries of the same report cheap.
    ///
    /// # Errors
    ///
    /// Stops at the first artifact that fails; see [`ReportClient::download`].
    pub async fn download_artifacts(
        &self,
        report_id: &str,
        result: &ReportResult,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, ClientError> {
        let mut paths = Vec::new();

        for artifact in result.artifacts() {
            let dest = dir.join(artifact.file_name(report_id));

            if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
                tracing::debug!(report_id, path = %dest.display(), "artifact already downloaded");
                paths.push(dest);
                continue;
            }

            let bytes = self.download(artifact.url, &dest).await?;
            tracing::info!(
                report_id,
                kind = artifact.kind.label(),
                bytes,
                path = %dest.display(),
                "artifact downloaded"
            );
            paths.push(dest);
        }

        Ok(paths)
    }
}
