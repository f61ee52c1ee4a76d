//! Reconciliation engine: matches backends across cycles and derives rates.
//!
//! [`reconcile`] is the pure step; [`Reconciler`] owns the baseline
//! snapshot and the time of the last successful cycle, so only the
//! poll loop that holds it can advance it.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::types::{BackendKey, BackendSnapshot, Reconciliation};

/// Reconcile `current` against `previous` over `elapsed_secs`.
///
/// Duplicate keys inside one snapshot resolve to the last occurrence.
/// A non-positive or non-finite `elapsed_secs` suppresses every rate
/// for the call; matching and retirement still happen.
pub fn reconcile(
    previous: &[BackendSnapshot],
    current: &[BackendSnapshot],
    elapsed_secs: f64,
) -> Reconciliation {
    let mut outcome = Reconciliation::default();

    if previous.is_empty() {
        outcome.bootstrap = !current.is_empty();
        return outcome;
    }

    let baseline = index_by_key(previous);
    let latest = index_by_key(current);
    let emit = elapsed_secs.is_finite() && elapsed_secs > 0.0;

    for (&(group, server), &old) in &baseline {
        let Some(&new) = latest.get(&(group, server)) else {
            outcome.retirals.insert(BackendKey::new(group, server));
            continue;
        };

        if new < old {
            outcome.resets.insert(BackendKey::new(group, server));
            continue;
        }

        if emit {
            let rate = (new - old) as f64 / elapsed_secs;
            outcome.updates.insert(BackendKey::new(group, server), rate);
        }
    }

    outcome
}

/// Index a snapshot by identity. Later entries overwrite earlier ones.
fn index_by_key(snapshot: &[BackendSnapshot]) -> HashMap<(&str, &str), u64> {
    let mut index = HashMap::with_capacity(snapshot.len());
    for b in snapshot {
        if let Some(dup) = index.insert((b.group.as_str(), b.server.as_str()), b.requests) {
            debug!(
                upstream = %b.group,
                server = %b.server,
                dropped = dup,
                kept = b.requests,
                "duplicate backend in snapshot, last entry wins"
            );
        }
    }
    index
}

/// Holds the baseline between polling cycles.
#[derive(Debug, Default)]
pub struct Reconciler {
    /// Snapshot from the last successful cycle.
    previous: Vec<BackendSnapshot>,
    /// When the last successful cycle completed.
    last_cycle: Option<Instant>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile a freshly decoded snapshot taken at `now`.
    ///
    /// The snapshot replaces the baseline in full and `now` becomes the
    /// last cycle time, whatever the outcome. Callers must only pass
    /// snapshots from successful fetches.
    pub fn observe(&mut self, current: Vec<BackendSnapshot>, now: Instant) -> Reconciliation {
        let elapsed = self
            .last_cycle
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);

        let outcome = reconcile(&self.previous, &current, elapsed);

        if outcome.bootstrap {
            info!(backends = current.len(), "baseline snapshot recorded");
        } else if !self.previous.is_empty() && elapsed <= 0.0 {
            warn!(elapsed, "no time elapsed since last cycle, rates skipped");
        }
        for key in &outcome.resets {
            debug!(upstream = %key.group, server = %key.server, "request counter reset, rate skipped");
        }

        self.previous = current;
        self.last_cycle = Some(now);
        outcome
    }

    /// The current baseline.
    pub fn baseline(&self) -> &[BackendSnapshot] {
        &self.previous
    }

    pub fn last_cycle(&self) -> Option<Instant> {
        self.last_cycle
    }
}
