mod app_config;
mod config;
pub mod report;
pub mod webhook;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    Artifact, ArtifactKind, Product, ReportHandle, ReportRequest, ReportResult, ReportSnapshot,
    ReportStatus, ScanRequest, SignalRequest, SolutionsRequest, Tier,
};
pub use webhook::{ReportFailure, WebhookPayload};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised by [`ReportRequest::validate`] before anything is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("{product} reports do not offer the {tier} tier")]
    UnsupportedTier { product: Product, tier: Tier },

    #[error("{product} request is missing required field `{field}`")]
    MissingField {
        product: Product,
        field: &'static str,
    },
}
