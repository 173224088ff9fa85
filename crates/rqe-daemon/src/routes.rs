//! Axum router and all HTTP handlers for rqe-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers via [`crate::middleware::with_http_layers`]. Tests can
//! drive the bare router or the layered one.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use rqe_db::DailyRow;
use tracing::{error, info, warn};

use crate::{
    api_types::{FillsResponse, OkResponse, StatusResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status_handler))
        .route("/fills", get(fills))
        .route("/halt", post(halt).fallback(post_required))
        .route("/resume", post(resume).fallback(post_required))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

/// Today's summary. A missing row is a quiet day, not a fault.
///
/// In lenient mode (the default) a failed lookup is served as the same
/// zero-valued summary and only logged.
pub(crate) async fn status_handler(State(st): State<Arc<AppState>>) -> Response {
    let now = Utc::now();
    let day = rqe_db::day_key(now);

    let lookup = rqe_db::fetch_daily(&st.db, &day).await;
    let summary = match lookup {
        Ok(Some(row)) => row,
        Ok(None) => DailyRow::zero(day),
        Err(err) if st.strict_store_errors => return store_error("status", err),
        Err(err) => {
            let msg = format!("{err:#}");
            warn!(day = %day, error = %msg, "status lookup failed; serving default summary");
            DailyRow::zero(day)
        }
    };

    let server_time_utc = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    (
        StatusCode::OK,
        Json(StatusResponse::from_daily(summary, server_time_utc)),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /fills
// ---------------------------------------------------------------------------

pub(crate) async fn fills(State(st): State<Arc<AppState>>) -> Response {
    match rqe_db::fetch_recent_fills(&st.db, st.fills_limit).await {
        Ok(rows) => (StatusCode::OK, Json::<FillsResponse>(rows)).into_response(),
        Err(err) => store_error("fills", err),
    }
}

// ---------------------------------------------------------------------------
// POST /halt  /resume
// ---------------------------------------------------------------------------

pub(crate) async fn halt(State(st): State<Arc<AppState>>) -> Response {
    set_halted(&st, true).await
}

pub(crate) async fn resume(State(st): State<Arc<AppState>>) -> Response {
    set_halted(&st, false).await
}

/// Both toggles are unconditional: the current flag is never consulted.
async fn set_halted(st: &AppState, halted: bool) -> Response {
    let day = rqe_db::today_utc();
    let op = if halted { "halt" } else { "resume" };

    if let Err(err) = rqe_db::set_daily_halted(&st.db, &day, halted).await {
        return store_error(op, err);
    }

    info!(day = %day, halted, "daily/{op}");
    (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
}

/// Any verb other than POST on a control route.
pub(crate) async fn post_required() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "POST required")
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Store failures surface as 500 with the raw error chain as plain text.
fn store_error(op: &'static str, err: anyhow::Error) -> Response {
    let msg = format!("{err:#}");
    error!(op, error = %msg, "store error");
    (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
}
