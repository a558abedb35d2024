use std::net::SocketAddr;

use anyhow::Context;
use chrono::Utc;
use mock_api::{serve, AppState, Store};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;

    let store = if settings.seed {
        Store::seeded(Utc::now())
    } else {
        Store::new()
    };
    info!(%addr, seed = settings.seed, "starting mock gallery api");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, AppState::new(store)).await
}
