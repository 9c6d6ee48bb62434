use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower::make::Shared;
use tracing_subscriber::EnvFilter;

use jobboard::auth::jwt::JwtService;
use jobboard::config::AppConfig;
use jobboard::db;
use jobboard::mailer::SmtpMailer;
use jobboard::prediction::HttpPredictor;
use jobboard::routes;
use jobboard::state::AppState;
use jobboard::store::{PgStore, Store};
use jobboard::sweeper::CampaignSweeper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "api",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        server_host = %config.server_host,
        server_port = config.server_port,
        smtp_host = %config.smtp_host,
        prediction_service_url = %config.prediction_service_url,
        campaign_sweep_interval_secs = config.campaign_sweep_interval_secs,
        "loaded backend configuration"
    );

    let pool = db::init_pool_with_size(&config.database_url, config.database_max_pool_size)?;
    let applied = db::run_migrations(&pool)?;
    tracing::info!(applied, "database migrations up to date");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let mailer = Arc::new(SmtpMailer::from_config(&config)?);
    let predictor = Arc::new(HttpPredictor::from_config(&config)?);
    let jwt = JwtService::from_config(&config)?;
    let sweep_interval = config.campaign_sweep_interval_secs;

    let state = AppState::new(store.clone(), config, mailer, predictor, jwt);
    let listen_addr: SocketAddr = {
        let config = state.config.clone();
        format!("{}:{}", config.server_host, config.server_port).parse()?
    };

    let sweeper = tokio::spawn(CampaignSweeper::new(store, sweep_interval).run());
    let router = routes::create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, Shared::new(router))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
