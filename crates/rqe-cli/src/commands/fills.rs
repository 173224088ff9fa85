//! `rqe fills ...`: read the fills feed and append fills by hand.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// One JSON object per line, newest first.
pub async fn list(pool: &SqlitePool, limit: u32) -> Result<()> {
    let fills = rqe_db::fetch_recent_fills(pool, limit).await?;
    for f in &fills {
        let line = serde_json::to_string(f).context("fill serialize failed")?;
        println!("{line}");
    }
    Ok(())
}

pub async fn record(pool: &SqlitePool, fill: &rqe_db::NewFill) -> Result<()> {
    let id = rqe_db::record_fill(pool, fill).await?;
    println!("fill_id={} symbol={} side={}", id, fill.symbol, fill.side);
    Ok(())
}
