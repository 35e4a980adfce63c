use anyhow::Result;
use cinebrowse::config::{check_env, log_filter, Config};
use dotenvy::dotenv;
use tracing::{info, warn};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG may come from .env, so load it before the subscriber.
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    check_env()?;
    let config = Config::from_env()?;
    cinebrowse::app::run_server(config).await
}
