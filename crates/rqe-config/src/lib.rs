//! Environment-driven configuration for the ledger service and CLI.
//!
//! Parsing is pure over a lookup closure so tests can feed a map instead of
//! touching process env. `LedgerConfig::from_env` is the production entry.
//! Empty values are treated the same as unset.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DB_PATH";
pub const ENV_API_PORT: &str = "API_PORT";
pub const ENV_API_HOST: &str = "API_HOST";
pub const ENV_FILLS_LIMIT: &str = "RQE_FILLS_LIMIT";
pub const ENV_STRICT_STORE_ERRORS: &str = "RQE_STRICT_STORE_ERRORS";
pub const ENV_AUTO_MIGRATE: &str = "RQE_AUTO_MIGRATE";
pub const ENV_LOG: &str = "RQE_LOG";

pub const DEFAULT_DB_PATH: &str = "/data/rqe.sqlite";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_FILLS_LIMIT: u32 = 50;

/// Upper bound for `RQE_FILLS_LIMIT`.
pub const MAX_FILLS_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerConfig {
    /// SQLite file backing the `daily` and `fills` tables.
    pub db_path: PathBuf,
    pub api_host: IpAddr,
    pub api_port: u16,
    /// Row cap for GET /fills.
    pub fills_limit: u32,
    /// When true, GET /status reports store failures as 500 instead of
    /// falling back to the zero-valued summary.
    pub strict_store_errors: bool,
    /// Apply the embedded schema migration at daemon boot.
    pub auto_migrate: bool,
    /// Fallback tracing filter directive when RUST_LOG is unset.
    pub log_filter: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            api_host: IpAddr::from([0, 0, 0, 0]),
            api_port: DEFAULT_API_PORT,
            fills_limit: DEFAULT_FILLS_LIMIT,
            strict_store_errors: false,
            auto_migrate: false,
            log_filter: None,
        }
    }
}

impl LedgerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut cfg = Self::default();

        if let Some(v) = get(ENV_DB_PATH) {
            cfg.db_path = PathBuf::from(v);
        }

        if let Some(v) = get(ENV_API_HOST) {
            cfg.api_host = v
                .parse()
                .with_context(|| format!("invalid {ENV_API_HOST}: {v:?}"))?;
        }

        if let Some(v) = get(ENV_API_PORT) {
            cfg.api_port = v
                .parse()
                .with_context(|| format!("invalid {ENV_API_PORT}: {v:?}"))?;
        }

        if let Some(v) = get(ENV_FILLS_LIMIT) {
            let n: u32 = v
                .parse()
                .with_context(|| format!("invalid {ENV_FILLS_LIMIT}: {v:?}"))?;
            if n == 0 || n > MAX_FILLS_LIMIT {
                bail!("{ENV_FILLS_LIMIT} must be in 1..={MAX_FILLS_LIMIT}, got {n}");
            }
            cfg.fills_limit = n;
        }

        if let Some(v) = get(ENV_STRICT_STORE_ERRORS) {
            cfg.strict_store_errors = parse_flag(ENV_STRICT_STORE_ERRORS, &v)?;
        }

        if let Some(v) = get(ENV_AUTO_MIGRATE) {
            cfg.auto_migrate = parse_flag(ENV_AUTO_MIGRATE, &v)?;
        }

        cfg.log_filter = get(ENV_LOG);

        Ok(cfg)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.api_host, self.api_port)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid {key}: expected a boolean, got {other:?}"),
    }
}
