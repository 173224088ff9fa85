use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::info;

use rqe_config::LedgerConfig;

/// Default row cap for the recent-fills feed.
pub const RECENT_FILLS_LIMIT: u32 = rqe_config::DEFAULT_FILLS_LIMIT;

/// Open the ledger database at `path`. The file must already exist; the
/// schema is owned by the trading engine.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    open(path, false).await
}

/// Open the ledger database at `path`, creating an empty file if absent.
/// Pair with [`migrate`] to get a usable schema.
pub async fn connect_or_create(path: &Path) -> Result<SqlitePool> {
    open(path, true).await
}

/// Pool over the database named by `cfg`. No connection is opened here:
/// a missing or unreadable file surfaces on the first query, so the HTTP
/// service can boot and report store errors per request. The file is created
/// only when the config asks for an automatic migration.
pub fn connect_with(cfg: &LedgerConfig) -> SqlitePool {
    let pool = pool_options().connect_lazy_with(connect_options(&cfg.db_path, cfg.auto_migrate));
    info!(db = %cfg.db_path.display(), "ledger db pool configured (lazy)");
    pool
}

async fn open(path: &Path, create_if_missing: bool) -> Result<SqlitePool> {
    let pool = pool_options()
        .connect_with(connect_options(path, create_if_missing))
        .await
        .with_context(|| format!("failed to open sqlite db at {}", path.display()))?;

    info!(db = %path.display(), "ledger db connected");
    Ok(pool)
}

fn connect_options(path: &Path, create_if_missing: bool) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create_if_missing)
        .busy_timeout(Duration::from_secs(5))
}

fn pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &SqlitePool) -> Result<DbStatus> {
    let (one,): (i64,) = sqlx::query_as::<_, (i64,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_daily_table: table_exists(pool, "daily").await?,
        has_fills_table: table_exists(pool, "fills").await?,
    })
}

async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    let (n,): (i64,) = sqlx::query_as::<_, (i64,)>(
        "select count(*) from sqlite_master where type = 'table' and name = ?1",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("status table-exists query failed: {name}"))?;
    Ok(n > 0)
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_daily_table: bool,
    pub has_fills_table: bool,
}

impl DbStatus {
    pub fn schema_ready(&self) -> bool {
        self.ok && self.has_daily_table && self.has_fills_table
    }
}

// ---------------------------------------------------------------------------
// Day / timestamp formatting
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD` key for the UTC calendar day containing `at`.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Key of the current UTC day.
pub fn today_utc() -> String {
    day_key(Utc::now())
}

/// Fill timestamp format, second precision with a `Z` suffix.
pub fn ts_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// ---------------------------------------------------------------------------
// daily
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub day: String,
    pub trades: i64,
    pub realized_pnl_usd: f64,
    pub halted: bool,
}

impl DailyRow {
    /// Summary for a day nothing has happened on yet.
    pub fn zero(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            trades: 0,
            realized_pnl_usd: 0.0,
            halted: false,
        }
    }
}

/// Fetch the summary row for `day`, `None` if the row does not exist.
pub async fn fetch_daily(pool: &SqlitePool, day: &str) -> Result<Option<DailyRow>> {
    let row = sqlx::query(
        r#"
        select day, trades, realized_pnl_usd, halted
        from daily
        where day = ?1
        "#,
    )
    .bind(day)
    .fetch_optional(pool)
    .await
    .context("fetch_daily failed")?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(Some(DailyRow {
        day: row.try_get("day")?,
        trades: row.try_get("trades")?,
        realized_pnl_usd: row.try_get("realized_pnl_usd")?,
        halted: row.try_get::<i64, _>("halted")? != 0,
    }))
}

/// Set the halted flag for `day`, materialising the row with zero totals if
/// it does not exist yet. Single statement, so readers never observe a
/// half-applied toggle.
pub async fn set_daily_halted(pool: &SqlitePool, day: &str, halted: bool) -> Result<()> {
    sqlx::query(
        r#"
        insert into daily (day, trades, realized_pnl_usd, halted)
        values (?1, 0, 0.0, ?2)
        on conflict(day) do update set halted = excluded.halted
        "#,
    )
    .bind(day)
    .bind(i64::from(halted))
    .execute(pool)
    .await
    .context("set_daily_halted failed")?;

    Ok(())
}

/// Overwrite the running totals for `day`. The halted flag is left alone
/// (new rows start un-halted).
pub async fn update_daily_totals(
    pool: &SqlitePool,
    day: &str,
    trades: i64,
    realized_pnl_usd: f64,
) -> Result<()> {
    if trades < 0 {
        bail!("update_daily_totals: trades must be >= 0, got {trades}");
    }

    sqlx::query(
        r#"
        insert into daily (day, trades, realized_pnl_usd, halted)
        values (?1, ?2, ?3, 0)
        on conflict(day) do update set
          trades = excluded.trades,
          realized_pnl_usd = excluded.realized_pnl_usd
        "#,
    )
    .bind(day)
    .bind(trades)
    .bind(realized_pnl_usd)
    .execute(pool)
    .await
    .context("update_daily_totals failed")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// fills
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillRow {
    pub id: i64,
    pub ts: String,
    pub mode: String,
    pub strategy: String,
    pub symbol: String,
    pub side: String,
    pub qty: f64,
    pub price: f64,
    pub fee: f64,
    pub pnl: f64,
    pub note: String,
}

#[derive(Debug, Clone)]
pub struct NewFill {
    pub mode: String, // paper | live
    pub strategy: String,
    pub symbol: String,
    pub side: String, // BUY | SELL
    pub qty: f64,
    pub price: f64,
    pub fee: f64,
    pub pnl: f64,
    pub note: String,
}

/// Most recent fills, newest (highest id) first, at most `limit` rows.
pub async fn fetch_recent_fills(pool: &SqlitePool, limit: u32) -> Result<Vec<FillRow>> {
    let rows = sqlx::query(
        r#"
        select id, ts, mode, strategy, symbol, side, qty, price, fee, pnl, note
        from fills
        order by id desc
        limit ?1
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
    .context("fetch_recent_fills failed")?;

    rows.iter()
        .map(|row| -> Result<FillRow> {
            Ok(FillRow {
                id: row.try_get("id")?,
                ts: row.try_get("ts")?,
                mode: row.try_get("mode")?,
                strategy: row.try_get("strategy")?,
                symbol: row.try_get("symbol")?,
                side: row.try_get("side")?,
                qty: row.try_get("qty")?,
                price: row.try_get("price")?,
                fee: row.try_get("fee")?,
                pnl: row.try_get("pnl")?,
                note: row.try_get("note")?,
            })
        })
        .collect()
}

/// Append a fill stamped with the current UTC time. Returns the assigned id.
pub async fn record_fill(pool: &SqlitePool, fill: &NewFill) -> Result<i64> {
    record_fill_at(pool, fill, Utc::now()).await
}

/// Append a fill with an explicit timestamp. Returns the assigned id.
pub async fn record_fill_at(pool: &SqlitePool, fill: &NewFill, at: DateTime<Utc>) -> Result<i64> {
    let res = sqlx::query(
        r#"
        insert into fills (ts, mode, strategy, symbol, side, qty, price, fee, pnl, note)
        values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(ts_utc(at))
    .bind(&fill.mode)
    .bind(&fill.strategy)
    .bind(&fill.symbol)
    .bind(&fill.side)
    .bind(fill.qty)
    .bind(fill.price)
    .bind(fill.fee)
    .bind(fill.pnl)
    .bind(&fill.note)
    .execute(pool)
    .await
    .context("record_fill failed")?;

    Ok(res.last_insert_rowid())
}
