use anyhow::Context;
use school_registry::api::{self, AppState};
use school_registry::config::Config;
use school_registry::db::init_db_with_pool_size;
use school_registry::Repository;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    if let Err(e) = serve().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Open the store from the environment's settings and serve the API until the
/// listener fails.
async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    let pool = init_db_with_pool_size(&config.database_path, config.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_path))?;
    let state = AppState::new(Arc::new(Repository::new(pool)));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, database = %config.database_path, "School registry listening");

    axum::serve(listener, api::create_router(state))
        .await
        .context("server stopped")
}
