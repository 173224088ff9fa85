//! Shared state for rqe-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The store handle is
//! injected here at boot (or by tests) rather than living in a global.

use rqe_config::LedgerConfig;
use sqlx::SqlitePool;

/// Static build metadata, logged at boot.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    /// Ledger store. The pool serialises access to the SQLite file.
    pub db: SqlitePool,
    /// Row cap for GET /fills.
    pub fills_limit: u32,
    /// GET /status reports store failures instead of serving the default
    /// summary.
    pub strict_store_errors: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, cfg: &LedgerConfig) -> Self {
        Self {
            build: BuildInfo {
                service: "rqe-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            db,
            fills_limit: cfg.fills_limit,
            strict_store_errors: cfg.strict_store_errors,
        }
    }

    /// State with default settings around an existing pool.
    pub fn with_pool(db: SqlitePool) -> Self {
        Self::new(db, &LedgerConfig::default())
    }
}
