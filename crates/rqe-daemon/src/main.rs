//! rqe-daemon entry point.
//!
//! This file is intentionally thin: it loads configuration, sets up tracing,
//! opens the ledger store, wires middleware, and starts the HTTP server. All
//! route handlers live in `routes.rs`; shared state lives in `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use rqe_config::LedgerConfig;
use rqe_daemon::{middleware, routes, state};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    let cfg = LedgerConfig::from_env().context("invalid configuration")?;
    init_tracing(cfg.log_filter.as_deref());

    let db = rqe_db::connect_with(&cfg);
    if cfg.auto_migrate {
        rqe_db::migrate(&db).await?;
        info!("ledger schema migration applied");
    }

    // Not fatal: /status degrades to the default summary and the other store
    // routes answer 500 until the engine creates the file and its tables.
    match rqe_db::status(&db).await {
        Ok(s) if !s.schema_ready() => warn!(
            has_daily_table = s.has_daily_table,
            has_fills_table = s.has_fills_table,
            "ledger schema incomplete"
        ),
        Ok(_) => {}
        Err(err) => warn!(error = %format!("{err:#}"), "ledger store unreachable at boot"),
    }

    let shared = Arc::new(state::AppState::new(db.clone(), &cfg));
    let cfg_json = serde_json::to_string(&cfg).context("config serialize failed")?;
    info!(
        service = shared.build.service,
        version = shared.build.version,
        config = %cfg_json,
        "starting"
    );

    let app = middleware::with_http_layers(routes::build_router(Arc::clone(&shared)));

    let addr = cfg.bind_addr();
    info!(db = %cfg.db_path.display(), "rqe-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    db.close().await;
    Ok(())
}

fn init_tracing(fallback: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback.unwrap_or("info"))),
        )
        .init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "ctrl-c handler unavailable; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
