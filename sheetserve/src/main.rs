use anyhow::{Context, Result};
use clap::Parser;

use sheetserve::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    let storage = config.storage();
    storage.ensure_directories()?;

    let app = sheetserve::http::router(storage);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated")?;

    Ok(())
}
