//! Report command handlers for the CLI.
//!
//! Create commands submit a request and, unless `--no-wait` is given, block
//! until the report finishes. `get` and `wait` work on an existing report id.

mod create;
mod wait;

use std::path::PathBuf;

use clap::Args;
use surmado_core::{ScanRequest, SignalRequest, SolutionsRequest, Tier};

pub(crate) use create::run_create;
pub(crate) use wait::{run_get, run_wait};

/// Options shared by every command that waits for a report.
#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Give up after this many minutes (defaults to `SURMADO_POLL_TIMEOUT_MINS`)
    #[arg(long)]
    pub timeout_mins: Option<u64>,
    /// Download the finished report files into this directory
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

/// Options for create commands.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Print the report id and exit without waiting for completion
    #[arg(long)]
    pub no_wait: bool,
    #[command(flatten)]
    pub wait: WaitArgs,
}

/// SEO audit of a website.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Website to audit
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub brand_name: String,
    /// Where the service sends the finished report
    #[arg(long)]
    pub email: String,
    /// basic or premium
    #[arg(long, default_value_t = Tier::Basic)]
    pub tier: Tier,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

/// AI-visibility analysis of a brand.
#[derive(Debug, Args)]
pub struct SignalArgs {
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub brand_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub industry: String,
    #[arg(long)]
    pub location: String,
    /// Target customer description
    #[arg(long)]
    pub persona: String,
    #[arg(long)]
    pub pain_points: String,
    #[arg(long)]
    pub brand_details: String,
    /// Comma-separated competitor names
    #[arg(long)]
    pub direct_competitors: String,
    /// basic or pro
    #[arg(long, default_value_t = Tier::Basic)]
    pub tier: Tier,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

/// Strategic recommendations (always the pro tier).
#[derive(Debug, Args)]
pub struct SolutionsArgs {
    #[arg(long)]
    pub brand_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub business_story: String,
    /// The decision the business is facing
    #[arg(long)]
    pub decision: String,
    /// What success looks like
    #[arg(long)]
    pub success: String,
    #[arg(long)]
    pub timeline: String,
    #[arg(long)]
    pub scale_indicator: String,
    #[command(flatten)]
    pub submit: SubmitArgs,
}

impl ScanArgs {
    pub(crate) fn into_parts(self) -> (ScanRequest, SubmitArgs) {
        let request = ScanRequest {
            url: self.url,
            brand_name: self.brand_name,
            email: self.email,
            tier: self.tier,
        };
        (request, self.submit)
    }
}

impl SignalArgs {
    pub(crate) fn into_parts(self) -> (SignalRequest, SubmitArgs) {
        let request = SignalRequest {
            url: self.url,
            brand_name: self.brand_name,
            email: self.email,
            industry: self.industry,
            location: self.location,
            persona: self.persona,
            pain_points: self.pain_points,
            brand_details: self.brand_details,
            direct_competitors: self.direct_competitors,
            tier: self.tier,
        };
        (request, self.submit)
    }
}

impl SolutionsArgs {
    pub(crate) fn into_parts(self) -> (SolutionsRequest, SubmitArgs) {
        let request = SolutionsRequest {
            brand_name: self.brand_name,
            email: self.email,
            business_story: self.business_story,
            decision: self.decision,
            success: self.success,
            timeline: self.timeline,
            scale_indicator: self.scale_indicator,
        };
        (request, self.submit)
    }
}
