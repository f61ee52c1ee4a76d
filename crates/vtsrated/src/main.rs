//! vtsrated: the vtsrate daemon.
//!
//! Polls an nginx VTS status page, turns each backend's cumulative
//! request counter into requests per second, and serves the result
//! for Prometheus:
//! - Poll loop (fetch → decode → reconcile → gauges)
//! - Metrics endpoint (`/metrics`, `/healthz`)
//!
//! # Usage
//!
//! ```text
//! VTS_URL=http://127.0.0.1/status/format/json SCRAPE_DURATION=15s vtsrated
//! ```

mod config;
mod poller;

use clap::Parser;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use vtsrate_metrics::{MetricsState, build_router};
use vtsrate_scrape::HttpStatusSource;

use crate::config::Config;
use crate::poller::Poller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,vtsrated=debug")),
        )
        .init();

    let config = Config::parse();
    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        url = %config.vts_url,
        interval = ?config.scrape_duration,
        timeout = ?config.scrape_timeout,
        "vtsrated starting"
    );

    let source = HttpStatusSource::new(&config.vts_url, config.scrape_timeout)?;
    let metrics = MetricsState::default();

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Poll loop ──────────────────────────────────────────────

    let poller = Poller::new(source, metrics.clone(), config.scrape_duration);
    let poll_handle = tokio::spawn(poller.run(shutdown_rx));

    // ── Metrics endpoint ───────────────────────────────────────

    let router = build_router(metrics);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "metrics endpoint listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    join_poller(poll_handle).await;

    info!("vtsrated stopped");
    Ok(())
}

/// Wait for the poll loop to exit. Returns false if it panicked or was cancelled.
async fn join_poller(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, panicked = e.is_panic(), "poller task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_poller_reports_clean_exit() {
        let handle = tokio::spawn(async {});
        assert!(join_poller(handle).await);
    }

    #[tokio::test]
    async fn join_poller_reports_panic() {
        let handle = tokio::spawn(async { panic!("poll loop blew up") });
        assert!(!join_poller(handle).await);
    }

    #[tokio::test]
    async fn join_poller_reports_cancellation() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        assert!(!join_poller(handle).await);
    }
}
