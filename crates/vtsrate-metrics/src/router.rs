//! HTTP surface for metric pulls.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::prometheus::render_prometheus;
use crate::registry::RateGauges;
use crate::stats::ScrapeStats;

/// Shared state for the metrics handlers.
#[derive(Clone, Default)]
pub struct MetricsState {
    pub gauges: RateGauges,
    pub stats: Arc<ScrapeStats>,
}

/// Build the metrics router.
pub fn build_router(state: MetricsState) -> Router {
    Router::new()
        .route("/metrics", get(prometheus_metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    let rates = state.gauges.rates().await;
    let body = render_prometheus(&rates, &state.stats.snapshot());
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
