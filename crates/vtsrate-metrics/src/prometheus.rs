//! Prometheus text exposition format.
//!
//! Renders the rate gauges and exporter stats into the text format
//! scraped by a Prometheus server or compatible agent.

use std::fmt::Write;

use vtsrate_reconcile::BackendKey;

use crate::stats::StatsSnapshot;

/// Name of the per-backend rate gauge.
pub const RPS_METRIC: &str = "http_rps_per_backend";

/// Render rate gauges and scrape stats into Prometheus text format.
///
/// Produces one `http_rps_per_backend` sample per backend labeled with
/// `upstream` and `server`, in the order given.
pub fn render_prometheus(rates: &[(BackendKey, f64)], stats: &StatsSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# HELP {RPS_METRIC} Requests per second on each nginx backend");
    let _ = writeln!(out, "# TYPE {RPS_METRIC} gauge");
    for (key, rate) in rates {
        let _ = writeln!(
            out,
            "{RPS_METRIC}{{upstream=\"{}\",server=\"{}\"}} {}",
            escape_label(&key.group),
            escape_label(&key.server),
            rate
        );
    }

    out.push_str("# HELP vts_scrape_cycles_total Poll cycles by outcome.\n");
    out.push_str("# TYPE vts_scrape_cycles_total counter\n");
    let _ = writeln!(out, "vts_scrape_cycles_total{{result=\"success\"}} {}", stats.successes);
    let _ = writeln!(out, "vts_scrape_cycles_total{{result=\"failure\"}} {}", stats.failures);

    if let Some(ts) = stats.last_success_secs {
        out.push_str(
            "# HELP vts_last_success_timestamp_seconds Unix time of the last successful poll cycle.\n",
        );
        out.push_str("# TYPE vts_last_success_timestamp_seconds gauge\n");
        let _ = writeln!(out, "vts_last_success_timestamp_seconds {ts:.3}");
    }

    out
}

/// Escape a label value: backslash, double quote and newline.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
