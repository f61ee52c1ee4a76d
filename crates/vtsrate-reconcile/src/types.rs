//! Snapshot and reconciliation result types.

use std::collections::{BTreeMap, BTreeSet};

/// Identity of a backend across polling cycles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackendKey {
    /// Owning upstream group.
    pub group: String,
    /// Backend address within the group.
    pub server: String,
}

impl BackendKey {
    pub fn new(group: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            server: server.into(),
        }
    }
}

/// One backend's cumulative request counter at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSnapshot {
    pub group: String,
    pub server: String,
    /// Requests served since the backend process last started.
    pub requests: u64,
}

impl BackendSnapshot {
    pub fn new(group: impl Into<String>, server: impl Into<String>, requests: u64) -> Self {
        Self {
            group: group.into(),
            server: server.into(),
            requests,
        }
    }
}

/// Outcome of reconciling one snapshot against the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// New requests-per-second values to publish.
    pub updates: BTreeMap<BackendKey, f64>,
    /// Backends that vanished; their gauges must be removed.
    pub retirals: BTreeSet<BackendKey>,
    /// Backends whose counter went backwards. Still live, no rate this cycle.
    pub resets: BTreeSet<BackendKey>,
    /// True when this snapshot only seeded an empty baseline.
    pub bootstrap: bool,
}

impl Reconciliation {
    /// Whether the registry needs touching at all.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.retirals.is_empty()
    }
}
