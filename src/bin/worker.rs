use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::time::interval;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use vcintel::db;
use vcintel::export::DEFAULT_CSV_PATH;
use vcintel::jobs::news::{run_news_ingest, DEFAULT_SINCE_DAYS, MAX_SINCE_DAYS};
use vcintel::jobs::yc::{run_yc_ingest, DEFAULT_MAX_COMPANIES};

#[derive(Parser)]
#[command(name = "vcintel-worker")]
#[command(about = "ETL worker for VC sourcing signals")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest funding news from the configured feeds
    News {
        /// Cap the raw entries taken across all feeds
        #[arg(long)]
        max_items: Option<usize>,
        /// Only keep items published within the last N days (0 keeps everything)
        #[arg(long, default_value_t = DEFAULT_SINCE_DAYS, value_parser = clap::value_parser!(i64).range(0..=MAX_SINCE_DAYS))]
        since_days: i64,
    },
    /// Ingest companies from the YC OSS API
    Yc {
        /// Cap the companies processed in this run
        #[arg(long, default_value_t = DEFAULT_MAX_COMPANIES)]
        max_companies: usize,
    },
    /// Run both ingest jobs once
    Run {
        /// Cap the raw entries taken across all feeds
        #[arg(long)]
        max_items: Option<usize>,
        /// Only keep items published within the last N days (0 keeps everything)
        #[arg(long, default_value_t = DEFAULT_SINCE_DAYS, value_parser = clap::value_parser!(i64).range(0..=MAX_SINCE_DAYS))]
        since_days: i64,
        /// Cap the companies processed in this run
        #[arg(long, default_value_t = DEFAULT_MAX_COMPANIES)]
        max_companies: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialise tracing (INFO level)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenv();

    let cli = Cli::parse();

    let conn = db::connect().await.map_err(|e| {
        error!("failed to connect to database: {e}");
        e
    })?;

    // The worker owns the schema; the read-only API server never migrates
    Migrator::up(&conn, None).await?;

    match cli.command {
        Some(Commands::News {
            max_items,
            since_days,
        }) => {
            news_job(&conn, max_items, since_days).await?;
        }
        Some(Commands::Yc { max_companies }) => {
            run_yc_ingest(&conn, max_companies).await?;
        }
        Some(Commands::Run {
            max_items,
            since_days,
            max_companies,
        }) => {
            news_job(&conn, max_items, since_days).await?;
            run_yc_ingest(&conn, max_companies).await?;
        }
        None => {
            info!("Worker starting; running jobs every 60 minutes");

            let mut ticker = interval(Duration::from_secs(60 * 60));
            loop {
                ticker.tick().await;
                info!("Running scheduled jobs...");

                if let Err(e) = news_job(&conn, None, DEFAULT_SINCE_DAYS).await {
                    error!("news job failed: {e}");
                }
                if let Err(e) = run_yc_ingest(&conn, DEFAULT_MAX_COMPANIES).await {
                    error!("yc job failed: {e}");
                }
                info!("Scheduled jobs finished.");
            }
        }
    }

    Ok(())
}

async fn news_job(
    conn: &DatabaseConnection,
    max_items: Option<usize>,
    since_days: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let csv_path =
        PathBuf::from(env::var("NEWS_CSV_PATH").unwrap_or_else(|_| DEFAULT_CSV_PATH.to_string()));
    run_news_ingest(conn, max_items, since_days, &csv_path).await?;
    Ok(())
}
