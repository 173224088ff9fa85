//! `rqe day ...`: inspect and toggle a day's ledger summary.

use anyhow::Result;
use rqe_db::DailyRow;
use sqlx::SqlitePool;

/// Print the summary for `day`. A missing row prints the zero summary with
/// `exists=false`.
pub async fn show(pool: &SqlitePool, day: &str) -> Result<()> {
    let (row, exists) = match rqe_db::fetch_daily(pool, day).await? {
        Some(row) => (row, true),
        None => (DailyRow::zero(day), false),
    };

    println!("day={}", row.day);
    println!("exists={}", exists);
    println!("trades={}", row.trades);
    println!("realized_pnl_usd={}", row.realized_pnl_usd);
    println!("halted={}", row.halted);
    Ok(())
}

pub async fn set_halted(pool: &SqlitePool, day: &str, halted: bool) -> Result<()> {
    rqe_db::set_daily_halted(pool, day, halted).await?;
    println!("day={} halted={}", day, halted);
    Ok(())
}

pub async fn set_totals(pool: &SqlitePool, day: &str, trades: i64, pnl: f64) -> Result<()> {
    rqe_db::update_daily_totals(pool, day, trades, pnl).await?;
    println!("day={} trades={} realized_pnl_usd={}", day, trades, pnl);
    Ok(())
}
