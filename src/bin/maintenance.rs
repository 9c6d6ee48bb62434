use std::env;
use std::fs::File;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use jobboard::{
    config::DatabaseConfig,
    db, metrics,
    store::{PgStore, Store},
    sweeper::CampaignSweeper,
};

const USAGE: &str = "Usage: maintenance close-expired-campaigns | export-employees <path>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("close-expired-campaigns") => close_expired_campaigns()?,
        Some("export-employees") => {
            let Some(path) = args.next() else {
                eprintln!("{USAGE}");
                std::process::exit(1);
            };
            export_employees(&path)?;
        }
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn open_store() -> Result<PgStore> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        "loaded backend configuration"
    );
    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
    Ok(PgStore::new(pool))
}

fn close_expired_campaigns() -> Result<()> {
    let store = open_store()?;
    let closed = CampaignSweeper::new(std::sync::Arc::new(store), 0)
        .sweep_once()
        .context("failed to close expired campaigns")?;
    println!("Closed {closed} expired campaigns.");
    Ok(())
}

fn export_employees(path: &str) -> Result<()> {
    let store = open_store()?;
    let rows = metrics::collect_features(&store as &dyn Store)
        .context("failed to compute employee features")?;
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    metrics::write_csv(file, &rows).context("failed to write CSV")?;
    println!("Exported {} employees to {path}.", rows.len());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
