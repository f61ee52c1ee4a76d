//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vtsrate_metrics::{MetricsState, build_router};
use vtsrate_reconcile::{BackendKey, Reconciliation};

async fn get_body(state: &MetricsState, uri: &str) -> (StatusCode, String) {
    let router = build_router(state.clone());
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_exposes_live_backends() {
    let state = MetricsState::default();
    state.gauges.set("api", "10.0.0.1:8080", 5.0).await;
    state.stats.record_success();

    let (status, body) = get_body(&state, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http_rps_per_backend{upstream=\"api\",server=\"10.0.0.1:8080\"} 5"));
    assert!(body.contains("vts_scrape_cycles_total{result=\"success\"} 1"));
}

#[tokio::test]
async fn retired_backend_disappears_from_metrics() {
    let state = MetricsState::default();
    state.gauges.set("api", "s1", 1.0).await;
    state.gauges.set("api", "s2", 1.0).await;

    let mut outcome = Reconciliation::default();
    outcome.updates.insert(BackendKey::new("api", "s1"), 2.0);
    outcome.retirals.insert(BackendKey::new("api", "s2"));
    state.gauges.apply(&outcome).await;

    let (_, body) = get_body(&state, "/metrics").await;
    assert!(body.contains("server=\"s1\"} 2"));
    assert!(!body.contains("server=\"s2\""));
}

#[tokio::test]
async fn healthz_returns_ok() {
    let (status, body) = get_body(&MetricsState::default(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, _) = get_body(&MetricsState::default(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
