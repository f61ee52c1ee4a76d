//! Status document decoding.
//!
//! Only the fields needed for rate computation are read; everything
//! else the module reports (byte counters, response codes, timings)
//! is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use vtsrate_reconcile::BackendSnapshot;

use crate::error::DecodeError;

/// Top-level VTS document. Absent `UpstreamZones` means no upstreams.
#[derive(Debug, Deserialize)]
struct StatusDocument {
    #[serde(rename = "UpstreamZones", default)]
    upstream_zones: BTreeMap<String, Vec<UpstreamServer>>,
}

/// One backend entry inside an upstream zone.
#[derive(Debug, Deserialize)]
struct UpstreamServer {
    server: String,
    #[serde(rename = "requestCounter")]
    request_counter: u64,
}

/// Decode a raw VTS status document into a flat list of backends.
///
/// Backends are ordered by group name, then by their position in the
/// group's list. Negative or non-integer counters are rejected.
pub fn decode_status(raw: &[u8]) -> Result<Vec<BackendSnapshot>, DecodeError> {
    let doc: StatusDocument = serde_json::from_slice(raw)?;

    let mut backends = Vec::new();
    for (group, servers) in doc.upstream_zones {
        if group.is_empty() {
            return Err(DecodeError::EmptyGroup);
        }
        for s in servers {
            if s.server.is_empty() {
                return Err(DecodeError::EmptyServer { group });
            }
            backends.push(BackendSnapshot::new(group.clone(), s.server, s.request_counter));
        }
    }

    debug!(backends = backends.len(), "status document decoded");
    Ok(backends)
}
