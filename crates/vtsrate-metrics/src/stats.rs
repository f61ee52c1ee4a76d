//! Exporter self-observability: scrape cycle outcomes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counts completed and failed poll cycles.
#[derive(Debug, Default)]
pub struct ScrapeStats {
    successes: AtomicU64,
    failures: AtomicU64,
    /// Unix time (ms) of the last successful cycle, 0 if none.
    last_success_ms: AtomicU64,
}

/// Point-in-time copy of [`ScrapeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    pub successes: u64,
    pub failures: u64,
    /// Seconds since the Unix epoch, `None` before the first success.
    pub last_success_secs: Option<f64>,
}

impl ScrapeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.last_success_ms.store(epoch_millis(), Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let last = self.last_success_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            last_success_secs: (last > 0).then(|| last as f64 / 1000.0),
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
