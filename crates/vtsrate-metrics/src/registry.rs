//! Labeled gauge store for per-backend request rates.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use vtsrate_reconcile::{BackendKey, Reconciliation};

/// Requests-per-second gauges keyed by (upstream, server).
///
/// Cheap to clone; all clones share the same series.
#[derive(Debug, Clone, Default)]
pub struct RateGauges {
    series: Arc<RwLock<BTreeMap<BackendKey, f64>>>,
}

impl RateGauges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gauge for a backend, creating it if needed.
    pub async fn set(&self, group: &str, server: &str, value: f64) {
        let mut series = self.series.write().await;
        series.insert(BackendKey::new(group, server), value);
    }

    /// Remove a backend's gauge. Returns whether it existed.
    pub async fn delete(&self, group: &str, server: &str) -> bool {
        let mut series = self.series.write().await;
        series.remove(&BackendKey::new(group, server)).is_some()
    }

    /// Apply one cycle's updates and retirals under a single write lock,
    /// so readers never observe a half-applied cycle.
    pub async fn apply(&self, outcome: &Reconciliation) {
        if outcome.is_empty() {
            return;
        }

        let mut series = self.series.write().await;
        for (key, rate) in &outcome.updates {
            series.insert(key.clone(), *rate);
        }
        for key in &outcome.retirals {
            if series.remove(key).is_some() {
                info!(upstream = %key.group, server = %key.server, "backend gone, gauge retired");
            }
        }
        debug!(
            updated = outcome.updates.len(),
            retired = outcome.retirals.len(),
            live = series.len(),
            "rate gauges applied"
        );
    }

    /// Current value for a backend, if exposed.
    pub async fn get(&self, group: &str, server: &str) -> Option<f64> {
        let series = self.series.read().await;
        series.get(&BackendKey::new(group, server)).copied()
    }

    /// All exposed series, ordered by key.
    pub async fn rates(&self) -> Vec<(BackendKey, f64)> {
        let series = self.series.read().await;
        series.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub async fn len(&self) -> usize {
        self.series.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.series.read().await.is_empty()
    }
}
