//! vtsrate-reconcile: turns cumulative request counters into rates.
//!
//! Each polling cycle produces a full snapshot of every backend's
//! cumulative request counter. Differencing two successive snapshots
//! over the time between them gives requests per second.
//!
//! # Algorithm
//!
//! ```text
//! for each backend in previous:
//!     match by (group, server) in current
//!       ├── missing        → retire its gauge
//!       ├── counter went ↓ → process restarted, skip this cycle
//!       └── otherwise      → rate = (new - old) / elapsed_secs
//! previous = current
//! ```
//!
//! A backend that appears for the first time has no baseline and gets
//! its first rate one cycle later. The very first non-empty snapshot
//! only seeds the baseline.

pub mod engine;
pub mod types;

pub use engine::{Reconciler, reconcile};
pub use types::{BackendKey, BackendSnapshot, Reconciliation};
