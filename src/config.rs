use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub bind_addr: SocketAddr,
    pub language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_token = env::var("TMDB_API_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("TMDB_API_TOKEN must be set"))?;
        let api_url = env_or("TMDB_API_URL", DEFAULT_API_URL);
        let bind_addr = env_or("CATALOG_BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse()
            .context("CATALOG_BIND_ADDR is not a valid socket address")?;
        let language = env_or("CATALOG_LANGUAGE", DEFAULT_LANGUAGE);
        Ok(Self {
            api_url,
            api_token,
            bind_addr,
            language,
        })
    }
}

pub fn check_env() -> Result<()> {
    let required = ["TMDB_API_TOKEN"];
    for key in required {
        if env::var(key).is_err() {
            anyhow::bail!("Missing required environment variable: {}", key);
        }
    }
    info!("All required environment variables are set");
    Ok(())
}

/// Log filter from `RUST_LOG`, so `.env` must be loaded before this is read.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
