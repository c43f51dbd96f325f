mod config;
mod detector;
mod duration;
mod messages;
mod persisted;
mod webhooks;
mod worker_loop;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use kvstore::SqliteStore;
use prusalink::PrusaLinkClient;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::detector::Detector;
use crate::webhooks::WebhookNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env()?;
    info!(
        api = %cfg.prusalink_api_url,
        delay = ?cfg.delay,
        db = %cfg.state_db_path.display(),
        "Starting PrusaLink webhook notifier"
    );

    // --- State store ---
    let store = SqliteStore::open(&cfg.state_db_path)
        .await
        .context("Failed to open state database")?;

    // --- HTTP ---
    let http = reqwest::Client::builder()
        .timeout(cfg.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let printer = PrusaLinkClient::new(&cfg.prusalink_api_url, &cfg.prusalink_api_key, http.clone());
    let notifier = WebhookNotifier::new(&cfg.webhook_url, http);

    let detector = Detector::new(
        Arc::new(printer),
        Arc::new(notifier),
        Arc::new(store.clone()),
        cfg.locale.catalog(),
    );

    let cancel = CancellationToken::new();
    let poll = tokio::spawn(crate::worker_loop::run_poll_loop(detector, cfg.delay, cancel.clone()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("shutdown requested");

    cancel.cancel();
    poll.await.context("poll loop task failed")?;
    store.close().await;

    info!("bye");
    Ok(())
}
