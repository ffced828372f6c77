use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_server::{ensure_schema, Config, TodoStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::parse();
    let addr = config.listen_addr()?;

    info!(database_url = %config.redacted_database_url(), "initializing store");
    let store = TodoStore::connect(&config.database_url).context("invalid DATABASE_URL")?;
    ensure_schema(&store, config.retry_policy()).await;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    todo_server::run(listener, store.clone()).await?;
    store.close().await;

    info!("server stopped");
    Ok(())
}
