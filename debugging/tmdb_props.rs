//! Fetch one title with details and print what the catalog would show for it.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- tv <tmdb_id>
//!   cargo run --bin tmdb_props -- search <query>
//! Requires TMDB_API_TOKEN in the environment (.env supported).

use anyhow::{Context, Result};
use cinebrowse::config::Config;
use cinebrowse::models::MediaType;
use cinebrowse::overlay::DetailView;
use cinebrowse::tmdb::{TmdbApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: cargo run --bin tmdb_props -- movie|tv <tmdb_id>");
        eprintln!("       cargo run --bin tmdb_props -- search <query>");
        std::process::exit(1);
    }

    let config = Config::from_env()?;
    let client = TmdbClient::from_config(&config)?;

    if args[1] == "search" {
        let query = args[2..].join(" ");
        let page = client.search(&query, 1, &config.language).await?;
        let cards: Vec<_> = page.results.iter().map(|item| item.card()).collect();
        let output = json!({
            "query": query,
            "total_results": page.total_results,
            "results": cards,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let media_type: MediaType = args[1].parse()?;
    let id: i64 = args[2].parse().context("tmdb_id must be an integer")?;
    let item = client
        .fetch_details(id, media_type, &config.language)
        .await?;
    let similar = item
        .details
        .as_ref()
        .map(|d| d.similar.iter().map(|s| s.title.clone()).collect::<Vec<_>>())
        .unwrap_or_default();

    let output = json!({
        "card": item.card(),
        "detail": DetailView::new(&item, &item),
        "similar": similar,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
