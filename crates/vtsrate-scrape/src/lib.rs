//! vtsrate-scrape: reads backend request counters from nginx VTS.
//!
//! The virtual host traffic status module publishes a JSON document with
//! one list of backends per upstream group. This crate fetches that
//! document over HTTP(S) and flattens it into [`BackendSnapshot`]s.
//!
//! # Architecture
//!
//! ```text
//! scrape(source)
//!   ├── StatusSource::fetch() → raw bytes   (HttpStatusSource in production)
//!   └── decode_status()       → Vec<BackendSnapshot>
//! ```
//!
//! [`BackendSnapshot`]: vtsrate_reconcile::BackendSnapshot

pub mod decode;
pub mod error;
pub mod fetch;

pub use decode::decode_status;
pub use error::{DecodeError, FetchError, ScrapeError};
pub use fetch::{HttpStatusSource, StatusSource};

use vtsrate_reconcile::BackendSnapshot;

/// Fetch one status document from `source` and decode it.
pub async fn scrape<S: StatusSource>(source: &S) -> Result<Vec<BackendSnapshot>, ScrapeError> {
    let raw = source.fetch().await?;
    Ok(decode_status(&raw)?)
}
