//! Inbound webhook payloads sent by the service when a report finishes.

use serde::{Deserialize, Serialize};

use crate::report::{Product, ReportResult, ReportStatus};

/// Notification body posted to the receiver.
///
/// A superset of [`ReportResult`]. Which download links are present depends
/// on `product` (only signal reports carry a PPTX link), so the links stay
/// optional rather than being split per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub report_id: String,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(flatten)]
    pub result: ReportResult,
}

impl WebhookPayload {
    /// Parses a raw request body.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] when the body is not JSON, lacks
    /// `report_id`/`status`, or carries an empty `report_id`.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: Self = serde_json::from_slice(body)?;
        if payload.report_id.trim().is_empty() {
            return Err(serde::de::Error::custom("report_id must not be empty"));
        }
        Ok(payload)
    }

    #[must_use]
    pub fn failure(&self) -> ReportFailure {
        ReportFailure {
            report_id: self.report_id.clone(),
            error: self
                .result
                .error
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        }
    }

    /// `product` as shown in logs, `unknown` when the service omitted it.
    #[must_use]
    pub fn product_label(&self) -> &'static str {
        self.product.unwrap_or(Product::Unknown).as_str()
    }
}

/// What the failed-report handler receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFailure {
    pub report_id: String,
    pub error: String,
}
