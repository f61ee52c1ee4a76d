//! vtsrate-metrics: exposes per-backend request rates to Prometheus.
//!
//! # Architecture
//!
//! ```text
//! RateGauges (shared, RwLock)
//!   ├── apply(&Reconciliation) ← poll loop, once per cycle
//!   └── rates()                → /metrics handler
//!
//! ScrapeStats (atomics)
//!   └── cycle success/failure counters for exporter health
//!
//! build_router()
//!   ├── GET /metrics → render_prometheus()
//!   └── GET /healthz
//! ```

pub mod prometheus;
pub mod registry;
pub mod router;
pub mod stats;

pub use prometheus::render_prometheus;
pub use registry::RateGauges;
pub use router::{MetricsState, build_router};
pub use stats::{ScrapeStats, StatsSnapshot};
