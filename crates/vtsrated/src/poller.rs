//! Poll loop: fetch, decode, reconcile, publish on a fixed period.
//!
//! The loop owns the [`Reconciler`], so cycles run strictly one after
//! another and only a successful scrape advances the baseline and the
//! last-cycle timestamp. A failed cycle is logged and waits for the
//! next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use vtsrate_metrics::{MetricsState, RateGauges, ScrapeStats};
use vtsrate_reconcile::{Reconciler, Reconciliation};
use vtsrate_scrape::{ScrapeError, StatusSource, scrape};

pub struct Poller<S> {
    source: S,
    reconciler: Reconciler,
    gauges: RateGauges,
    stats: Arc<ScrapeStats>,
    interval: Duration,
}

impl<S: StatusSource> Poller<S> {
    pub fn new(source: S, metrics: MetricsState, interval: Duration) -> Self {
        Self {
            source,
            reconciler: Reconciler::new(),
            gauges: metrics.gauges,
            stats: metrics.stats,
            interval,
        }
    }

    /// Run one cycle. On error nothing is changed.
    pub async fn poll_once(&mut self) -> Result<Reconciliation, ScrapeError> {
        let backends = scrape(&self.source).await?;
        let now = Instant::now().into_std();

        let outcome = self.reconciler.observe(backends, now);
        self.gauges.apply(&outcome).await;
        Ok(outcome)
    }

    /// Poll every `interval` until shutdown. The first cycle runs immediately.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "poller started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.poll_once().await {
                        Ok(outcome) => {
                            self.stats.record_success();
                            debug!(
                                updated = outcome.updates.len(),
                                retired = outcome.retirals.len(),
                                resets = outcome.resets.len(),
                                bootstrap = outcome.bootstrap,
                                "poll cycle complete"
                            );
                        }
                        Err(e) => {
                            self.stats.record_failure();
                            warn!(error = %e, "poll cycle skipped");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("poller shutting down");
                    break;
                }
            }
        }
    }

    #[cfg(test)]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }
}
