use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rqe")]
#[command(about = "RQE ledger CLI (reads DB_PATH)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Daily summary commands
    Day {
        #[command(subcommand)]
        cmd: DayCmd,
    },

    /// Fills feed commands
    Fills {
        #[command(subcommand)]
        cmd: FillsCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    /// Connectivity + schema presence
    Status,

    /// Create the ledger file if needed and apply the embedded schema.
    Migrate,
}

#[derive(Subcommand)]
enum DayCmd {
    /// Print a day's summary (zero summary if the day has no row yet)
    Show {
        /// UTC day, YYYY-MM-DD (default: today)
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<String>,
    },

    /// Set halted=true for a day
    Halt {
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<String>,
    },

    /// Set halted=false for a day
    Resume {
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<String>,
    },

    /// Overwrite a day's trade count and realized P&L (halted flag untouched)
    SetTotals {
        #[arg(long, value_parser = commands::parse_day)]
        day: Option<String>,

        #[arg(long)]
        trades: i64,

        /// Realized P&L in USD
        #[arg(long, allow_hyphen_values = true)]
        pnl: f64,
    },
}

#[derive(Subcommand)]
enum FillsCmd {
    /// Print the most recent fills, newest first, one JSON object per line
    List {
        #[arg(long, default_value_t = rqe_db::RECENT_FILLS_LIMIT)]
        limit: u32,
    },

    /// Append a fill stamped with the current UTC time
    Record {
        /// paper | live
        #[arg(long)]
        mode: String,

        #[arg(long)]
        strategy: String,

        #[arg(long)]
        symbol: String,

        /// BUY | SELL
        #[arg(long)]
        side: String,

        #[arg(long)]
        qty: f64,

        #[arg(long)]
        price: f64,

        #[arg(long, default_value_t = 0.0)]
        fee: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pnl: f64,

        #[arg(long, default_value = "")]
        note: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Db { cmd } => match cmd {
            DbCmd::Status => {
                let pool = commands::open_existing().await?;
                let s = rqe_db::status(&pool).await?;
                println!(
                    "db_ok={} has_daily_table={} has_fills_table={} schema_ready={}",
                    s.ok,
                    s.has_daily_table,
                    s.has_fills_table,
                    s.schema_ready()
                );
            }
            DbCmd::Migrate => {
                let pool = commands::open_or_create().await?;
                rqe_db::migrate(&pool).await?;
                println!("migrations_applied=true");
            }
        },

        Commands::Day { cmd } => {
            let pool = commands::open_existing().await?;
            match cmd {
                DayCmd::Show { day } => {
                    commands::day::show(&pool, &commands::day_or_today(day)).await?
                }
                DayCmd::Halt { day } => {
                    commands::day::set_halted(&pool, &commands::day_or_today(day), true).await?
                }
                DayCmd::Resume { day } => {
                    commands::day::set_halted(&pool, &commands::day_or_today(day), false).await?
                }
                DayCmd::SetTotals { day, trades, pnl } => {
                    commands::day::set_totals(&pool, &commands::day_or_today(day), trades, pnl)
                        .await?
                }
            }
        }

        Commands::Fills { cmd } => {
            let pool = commands::open_existing().await?;
            match cmd {
                FillsCmd::List { limit } => commands::fills::list(&pool, limit).await?,
                FillsCmd::Record {
                    mode,
                    strategy,
                    symbol,
                    side,
                    qty,
                    price,
                    fee,
                    pnl,
                    note,
                } => {
                    let fill = rqe_db::NewFill {
                        mode,
                        strategy,
                        symbol,
                        side,
                        qty,
                        price,
                        fee,
                        pnl,
                        note,
                    };
                    commands::fills::record(&pool, &fill).await?
                }
            }
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
