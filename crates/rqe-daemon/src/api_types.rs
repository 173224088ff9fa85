//! Response types for the rqe-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded
//! by Axum and decoded by the scenario tests. No business logic lives here.

use rqe_db::DailyRow;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /status
// ---------------------------------------------------------------------------

/// Today's ledger summary plus the server clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub day: String,
    pub trades: i64,
    pub realized_pnl_usd: f64,
    pub halted: bool,
    /// RFC 3339, second precision. Independent of `day`; meant for client
    /// clock-sync.
    pub server_time_utc: String,
}

impl StatusResponse {
    pub fn from_daily(row: DailyRow, server_time_utc: String) -> Self {
        Self {
            day: row.day,
            trades: row.trades,
            realized_pnl_usd: row.realized_pnl_usd,
            halted: row.halted,
            server_time_utc,
        }
    }
}

// ---------------------------------------------------------------------------
// /halt  /resume
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

// ---------------------------------------------------------------------------
// /fills
// ---------------------------------------------------------------------------

/// Fills are served exactly as stored.
pub type FillsResponse = Vec<rqe_db::FillRow>;
