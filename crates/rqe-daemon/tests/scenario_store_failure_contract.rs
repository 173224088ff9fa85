//! Scenario: how each route reports a broken store.
//!
//! - GET /status serves the default summary (lenient, the default) or 500
//!   with the error text (strict).
//! - GET /fills and POST /halt|/resume answer 500 with the error text.
//! - GET /health never touches the store.
//!
//! The store is broken by closing the pool under the router.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rqe_daemon::{routes, state};
use tempfile::TempDir;
use tower::ServiceExt; // oneshot

async fn broken_state(strict: bool) -> (TempDir, Arc<state::AppState>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = rqe_db::connect_or_create(&dir.path().join("rqe.sqlite"))
        .await
        .expect("open db");
    rqe_db::migrate(&pool).await.expect("migrate");
    pool.close().await;

    let mut st = state::AppState::with_pool(pool);
    st.strict_store_errors = strict;
    (dir, Arc::new(st))
}

async fn call(router: axum::Router, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn lenient_status_masks_store_failure_as_quiet_day() {
    let (_dir, st) = broken_state(false).await;

    let (status, body) = call(routes::build_router(st), "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["day"], rqe_db::today_utc());
    assert_eq!(json["trades"], 0);
    assert_eq!(json["realized_pnl_usd"], 0.0);
    assert_eq!(json["halted"], false);
    assert!(json["server_time_utc"].is_string());
}

#[tokio::test]
async fn strict_status_surfaces_store_failure() {
    let (_dir, st) = broken_state(true).await;

    let (status, body) = call(routes::build_router(st), "GET", "/status").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("fetch_daily failed"), "body: {body}");
}

#[tokio::test]
async fn fills_store_failure_is_500_with_error_text() {
    let (_dir, st) = broken_state(false).await;

    let (status, body) = call(routes::build_router(st), "GET", "/fills").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("fetch_recent_fills failed"), "body: {body}");
}

#[tokio::test]
async fn control_store_failure_is_500_with_error_text() {
    let (_dir, st) = broken_state(false).await;

    for uri in ["/halt", "/resume"] {
        let (status, body) = call(routes::build_router(Arc::clone(&st)), "POST", uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(body.contains("set_daily_halted failed"), "{uri} body: {body}");
    }
}

#[tokio::test]
async fn health_is_independent_of_the_store() {
    let (_dir, st) = broken_state(true).await;

    let (status, body) = call(routes::build_router(st), "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn missing_tables_behave_like_a_broken_store() {
    let dir = tempfile::tempdir().unwrap();
    let pool = rqe_db::connect_or_create(&dir.path().join("bare.sqlite"))
        .await
        .unwrap();
    let st = Arc::new(state::AppState::with_pool(pool));

    let (status, _) = call(routes::build_router(Arc::clone(&st)), "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(routes::build_router(Arc::clone(&st)), "GET", "/fills").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("no such table"), "body: {body}");
}
