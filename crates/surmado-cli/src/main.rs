mod reports;

use clap::{Parser, Subcommand};
use surmado_client::ReportClient;
use surmado_core::ReportRequest;
use tracing_subscriber::EnvFilter;

use crate::reports::{ScanArgs, SignalArgs, SolutionsArgs, WaitArgs};

#[derive(Debug, Parser)]
#[command(name = "surmado-cli")]
#[command(about = "Create and track Surmado reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an SEO scan report
    Scan(ScanArgs),
    /// Create an AI-visibility signal report
    Signal(SignalArgs),
    /// Create a solutions report
    Solutions(SolutionsArgs),
    /// Print the current state of a report as JSON
    Get {
        report_id: String,
    },
    /// Wait for an existing report to finish
    Wait {
        report_id: String,
        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = surmado_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ReportClient::from_config(&config)?;
    let default_timeout = config.poll_timeout();

    match cli.command {
        Commands::Scan(args) => {
            let (request, submit) = args.into_parts();
            reports::run_create(&client, &ReportRequest::from(request), &submit, default_timeout)
                .await?;
        }
        Commands::Signal(args) => {
            let (request, submit) = args.into_parts();
            reports::run_create(&client, &ReportRequest::from(request), &submit, default_timeout)
                .await?;
        }
        Commands::Solutions(args) => {
            let (request, submit) = args.into_parts();
            reports::run_create(&client, &ReportRequest::from(request), &submit, default_timeout)
                .await?;
        }
        Commands::Get { report_id } => reports::run_get(&client, &report_id).await?,
        Commands::Wait { report_id, wait } => {
            reports::run_wait(&client, &report_id, &wait, default_timeout).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
