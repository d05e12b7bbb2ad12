mod api;
mod error;
mod handler;
mod middleware;
mod worker;

use surmado_client::ReportClient;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    handler::NotifyingHandler,
    worker::run_download_worker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = surmado_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Download links are pre-signed, so the worker's client needs no API key.
    let (handler, worker) = match &config.download_dir {
        Some(dir) => {
            let client = ReportClient::with_base_url(
                config.api_key.as_deref().unwrap_or_default(),
                config.request_timeout_secs,
                &config.base_url,
            )?
            .with_retry(config.max_retries, config.retry_backoff_base_ms);
            let (tx, rx) = mpsc::channel(config.download_queue_capacity);
            let worker = tokio::spawn(run_download_worker(client, dir.clone(), rx));
            (NotifyingHandler::with_downloads(tx), Some(worker))
        }
        None => (NotifyingHandler::log_only(), None),
    };

    let app = build_app(AppState::new(handler), &config.webhook_path);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        env = %config.env,
        addr = %config.bind_addr,
        path = %config.webhook_path,
        downloads = config.download_dir.is_some(),
        "webhook receiver listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last queue sender) is gone, so the worker
    // finishes whatever is queued and exits.
    if let Some(worker) = worker {
        worker.await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
