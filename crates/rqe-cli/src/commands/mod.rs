//! Command handler modules for the `rqe` CLI.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod day;
pub mod fills;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rqe_config::LedgerConfig;
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Open the ledger named by the environment. The file must exist.
pub async fn open_existing() -> Result<SqlitePool> {
    let cfg = LedgerConfig::from_env()?;
    rqe_db::connect(&cfg.db_path).await
}

/// Open the ledger named by the environment, creating the file if needed.
pub async fn open_or_create() -> Result<SqlitePool> {
    let cfg = LedgerConfig::from_env()?;
    rqe_db::connect_or_create(&cfg.db_path).await
}

/// clap value parser for `--day`: strict `YYYY-MM-DD`.
pub fn parse_day(s: &str) -> Result<String> {
    let d = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --day '{s}'. expected YYYY-MM-DD"))?;
    Ok(d.format("%Y-%m-%d").to_string())
}

/// `--day` if given, today (UTC) otherwise.
pub fn day_or_today(day: Option<String>) -> String {
    day.unwrap_or_else(rqe_db::today_utc)
}
