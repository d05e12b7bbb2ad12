//! Report request, handle, status and result types for the Surmado API.
//!
//! Creation bodies are product-specific and share nothing beyond `email` and
//! `tier`; [`ReportRequest`] serializes as the bare product body so the
//! product itself only appears in the URL path.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use crate::RequestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Scan,
    Signal,
    Solutions,
    #[serde(other)]
    Unknown,
}

impl Product {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Product::Scan => "scan",
            Product::Signal => "signal",
            Product::Solutions => "solutions",
            Product::Unknown => "unknown",
        }
    }

    /// Tiers the service accepts for this product.
    #[must_use]
    pub fn allowed_tiers(self) -> &'static [Tier] {
        match self {
            Product::Scan => &[Tier::Basic, Tier::Premium],
            Product::Signal => &[Tier::Basic, Tier::Pro],
            Product::Solutions => &[Tier::Pro],
            Product::Unknown => &[],
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Premium,
    Pro,
}

impl Tier {
    /// Credits charged for one report at this tier.
    #[must_use]
    pub fn credit_cost(self) -> u32 {
        match self {
            Tier::Basic => 1,
            Tier::Premium | Tier::Pro => 2,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Basic => write!(f, "basic"),
            Tier::Premium => write!(f, "premium"),
            Tier::Pro => write!(f, "pro"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Tier::Basic),
            "premium" => Ok(Tier::Premium),
            "pro" => Ok(Tier::Pro),
            other => Err(format!(
                "unknown tier '{other}' (expected basic, premium or pro)"
            )),
        }
    }
}

/// SEO audit of a website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub url: String,
    pub brand_name: String,
    pub email: String,
    pub tier: Tier,
}

/// AI-visibility test across assistant platforms.
///
/// `pain_points` and `direct_competitors` are free text; the service rejects
/// JSON arrays for either field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalRequest {
    pub url: String,
    pub brand_name: String,
    pub email: String,
    pub industry: String,
    pub location: String,
    pub persona: String,
    pub pain_points: String,
    pub brand_details: String,
    pub direct_competitors: String,
    pub tier: Tier,
}

/// Strategic advisory report. Always billed at the pro tier, so no tier is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionsRequest {
    pub brand_name: String,
    pub email: String,
    pub business_story: String,
    pub decision: String,
    pub success: String,
    pub timeline: String,
    pub scale_indicator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportRequest {
    Scan(ScanRequest),
    Signal(SignalRequest),
    Solutions(SolutionsRequest),
}

impl ReportRequest {
    #[must_use]
    pub fn product(&self) -> Product {
        match self {
            ReportRequest::Scan(_) => Product::Scan,
            ReportRequest::Signal(_) => Product::Signal,
            ReportRequest::Solutions(_) => Product::Solutions,
        }
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            ReportRequest::Scan(r) => r.tier,
            ReportRequest::Signal(r) => r.tier,
            ReportRequest::Solutions(_) => Tier::Pro,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            ReportRequest::Scan(r) => &r.email,
            ReportRequest::Signal(r) => &r.email,
            ReportRequest::Solutions(r) => &r.email,
        }
    }

    /// Checks the tier against the product and that no required field is blank.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnsupportedTier`] or [`RequestError::MissingField`].
    pub fn validate(&self) -> Result<(), RequestError> {
        let product = self.product();
        let tier = self.tier();
        if !product.allowed_tiers().contains(&tier) {
            return Err(RequestError::UnsupportedTier { product, tier });
        }

        let fields: Vec<(&'static str, &str)> = match self {
            ReportRequest::Scan(r) => vec![
                ("url", r.url.as_str()),
                ("brand_name", r.brand_name.as_str()),
                ("email", r.email.as_str()),
            ],
            ReportRequest::Signal(r) => vec![
                ("url", r.url.as_str()),
                ("brand_name", r.brand_name.as_str()),
                ("email", r.email.as_str()),
                ("industry", r.industry.as_str()),
                ("location", r.location.as_str()),
                ("persona", r.persona.as_str()),
                ("pain_points", r.pain_points.as_str()),
                ("brand_details", r.brand_details.as_str()),
                ("direct_competitors", r.direct_competitors.as_str()),
            ],
            ReportRequest::Solutions(r) => vec![
                ("brand_name", r.brand_name.as_str()),
                ("email", r.email.as_str()),
                ("business_story", r.business_story.as_str()),
                ("decision", r.decision.as_str()),
                ("success", r.success.as_str()),
                ("timeline", r.timeline.as_str()),
                ("scale_indicator", r.scale_indicator.as_str()),
            ],
        };

        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(RequestError::MissingField { product, field }),
            None => Ok(()),
        }
    }
}

impl From<ScanRequest> for ReportRequest {
    fn from(r: ScanRequest) -> Self {
        ReportRequest::Scan(r)
    }
}

impl From<SignalRequest> for ReportRequest {
    fn from(r: SignalRequest) -> Self {
        ReportRequest::Signal(r)
    }
}

impl From<SolutionsRequest> for ReportRequest {
    fn from(r: SolutionsRequest) -> Self {
        ReportRequest::Solutions(r)
    }
}

/// Returned by the creation endpoint. `report_id` keys every later lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHandle {
    pub report_id: String,
    #[serde(default)]
    pub credits_used: u32,
}

/// Service-reported report status.
///
/// Intermediate names are owned by the service; anything other than the four
/// known values is kept verbatim in [`ReportStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl ReportStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Failed)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Processing => "processing",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
            ReportStatus::Other(s) => s,
        }
    }
}

impl From<String> for ReportStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => ReportStatus::Pending,
            "processing" => ReportStatus::Processing,
            "completed" => ReportStatus::Completed,
            "failed" => ReportStatus::Failed,
            _ => ReportStatus::Other(s),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal payload of a report.
///
/// Download URLs are pre-signed and expire roughly 15 minutes after they are
/// issued; fetch or persist them promptly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pptx_download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence_download_url: Option<String>,
    /// Informational only. Timestamps that cannot be read as a date become
    /// `None` instead of rejecting the whole body.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportResult {
    /// Present download links, in PDF, PPTX, intelligence order.
    #[must_use]
    pub fn artifacts(&self) -> Vec<Artifact<'_>> {
        [
            (ArtifactKind::Pdf, self.download_url.as_deref()),
            (ArtifactKind::Pptx, self.pptx_download_url.as_deref()),
            (
                ArtifactKind::Intelligence,
                self.intelligence_download_url.as_deref(),
            ),
        ]
        .into_iter()
        .filter_map(|(kind, url)| {
            url.filter(|u| !u.is_empty())
                .map(|url| Artifact { kind, url })
        })
        .collect()
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

/// RFC 3339, or a naive `YYYY-MM-DD[T ]HH:MM:SS[.frac]` taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Pdf,
    Pptx,
    Intelligence,
}

impl ArtifactKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Pptx => "pptx",
            ArtifactKind::Intelligence => "json",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "PDF",
            ArtifactKind::Pptx => "PPTX",
            ArtifactKind::Intelligence => "JSON",
        }
    }
}

/// One downloadable file of a completed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifact<'a> {
    pub kind: ArtifactKind,
    pub url: &'a str,
}

impl Artifact<'_> {
    /// Local file name for this artifact, e.g. `rpt_abc123.pdf`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` in the report id become `_` so a
    /// hostile id cannot escape the download directory. When that changes the
    /// id, the first 8 hex digits of its SHA-256 are appended so distinct ids
    /// never share a file.
    #[must_use]
    pub fn file_name(&self, report_id: &str) -> String {
        let sanitized: String = report_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let stem = if report_id.is_empty() {
            "report".to_string()
        } else if sanitized == report_id {
            sanitized
        } else {
            let digest = format!("{:x}", Sha256::digest(report_id.as_bytes()));
            format!("{sanitized}-{}", &digest[..8])
        };
        format!("{stem}.{}", self.kind.extension())
    }
}

/// Body of `GET /reports/{report_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    #[serde(default)]
    pub report_id: String,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(flatten)]
    pub result: ReportResult,
}
