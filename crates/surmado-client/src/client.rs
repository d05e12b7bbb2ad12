//! HTTP client for the Surmado reports API.
//!
//! Wraps `reqwest` with the `X-API-Key` header, typed request and response
//! bodies, and the service's error contract: any non-2xx answer becomes
//! [`ClientError::Api`] carrying the JSON error body when one was sent.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use surmado_core::{AppConfig, ReportHandle, ReportRequest, ReportSnapshot};

use crate::error::ClientError;
use crate::retry::{is_connect_failure, is_transient, retry_with_backoff};

const DEFAULT_BASE_URL: &str = "https://api.surmado.com/v1";
const API_KEY_HEADER: &str = "X-API-Key";

pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Client for the Surmado reports API.
///
/// Use [`ReportClient::new`] for production, [`ReportClient::from_config`] to
/// honour the environment, or [`ReportClient::with_base_url`] to point at a
/// mock server in tests.
pub struct ReportClient {
    pub(crate) client: Client,
    api_key: String,
    base_url: Url,
    pub(crate) poll_interval: Duration,
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_ms: u64,
}

impl ReportClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// Retries default to 3 attempts with a 1 s back-off base and the poll
    /// interval to 30 s; see [`ReportClient::with_retry`] and
    /// [`ReportClient::with_poll_interval`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("surmado-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash, so endpoint segments append after the
        // version prefix instead of replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an absolute http(s) URL".to_owned()));
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Builds a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Config`] if no API key is configured.
    /// - Anything [`ReportClient::with_base_url`] returns.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let api_key = config.require_api_key()?;
        Ok(
            Self::with_base_url(api_key, config.request_timeout_secs, &config.base_url)?
                .with_retry(config.max_retries, config.retry_backoff_base_ms)
                .with_poll_interval(config.poll_interval()),
        )
    }

    /// Overrides the fixed delay between status polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the per-call retry budget for transient failures.
    /// `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Submits a report request.
    ///
    /// Calls `POST /reports/{product}`. The request is validated first, so a
    /// tier the product does not offer never reaches the service. Only
    /// connection failures are retried: a duplicate POST could bill twice.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRequest`] if validation fails.
    /// - [`ClientError::Api`] on a non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the 2xx body is not a report handle.
    pub async fn create_report(&self, request: &ReportRequest) -> Result<ReportHandle, ClientError> {
        request.validate()?;
        let product = request.product();
        let url = self.endpoint(&["reports", product.as_str()]);
        let context = format!("create_report(product={product})");

        let handle: ReportHandle = retry_with_backoff(
            self.max_retries,
            self.backoff_base_ms,
            is_connect_failure,
            || self.request_json(Method::POST, &url, Some(request), &context),
        )
        .await?;

        tracing::info!(
            report_id = %handle.report_id,
            product = %product,
            tier = %request.tier(),
            credits_used = handle.credits_used,
            "report created"
        );
        Ok(handle)
    }

    /// Fetches the current status and, once terminal, the result of a report.
    ///
    /// Calls `GET /reports/{report_id}`; transient failures are retried.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the 2xx body is not a snapshot.
    pub async fn get_report(&self, report_id: &str) -> Result<ReportSnapshot, ClientError> {
        let url = self.endpoint(&["reports", report_id]);
        let context = format!("get_report(report_id={report_id})");

        let mut snapshot: ReportSnapshot = retry_with_backoff(
            self.max_retries,
            self.backoff_base_ms,
            is_transient,
            || self.request_json(Method::GET, &url, None, &context),
        )
        .await?;

        if snapshot.report_id.is_empty() {
            report_id.clone_into(&mut snapshot.report_id);
        }
        Ok(snapshot)
    }

    /// Appends percent-encoded path segments to the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The base was checked for `cannot_be_a_base` at construction.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends one authenticated request and decodes a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for a non-2xx status (with the body parsed
    /// as JSON when possible), [`ClientError::Http`] on network failure, and
    /// [`ClientError::Deserialize`] if the 2xx body does not match `T`.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&ReportRequest>,
        context: &str,
    ) -> Result<T, ClientError> {
        let mut request = self
            .client
            .request(method, url.clone())
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body: serde_json::from_str(&text).ok(),
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
