use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::models::{Category, MediaItem, MediaType, ResultPage, TimeWindow, TrendingScope};

mod client;
mod wire;

pub use client::TmdbClient;

/// Marker that turns a search query into a direct id lookup.
pub const ID_QUERY_PREFIX: &str = "id::";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListByCategory,
    ListTrending,
    Search,
    FetchById,
    FetchDetails,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ListByCategory => "list_by_category",
            Operation::ListTrending => "list_trending",
            Operation::Search => "search",
            Operation::FetchById => "fetch_by_id",
            Operation::FetchDetails => "fetch_details",
        })
    }
}

/// The only failure the client produces: transport errors, non-2xx
/// statuses and undecodable bodies all end up here.
#[derive(Debug, Clone, Error)]
#[error("TMDB {operation} failed (status {}): {detail}", display_status(.status))]
pub struct UpstreamError {
    pub operation: Operation,
    pub status: Option<u16>,
    pub detail: String,
}

fn display_status(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string())
}

impl UpstreamError {
    pub fn new(operation: Operation, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            operation,
            status,
            detail: detail.into(),
        }
    }
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn list_by_category(
        &self,
        category: Category,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<ResultPage, UpstreamError>;

    async fn list_trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        language: &str,
    ) -> Result<ResultPage, UpstreamError>;

    async fn search(&self, query: &str, page: u32, language: &str)
        -> Result<ResultPage, UpstreamError>;

    async fn fetch_by_id(
        &self,
        id: &str,
        media_type: MediaType,
        language: &str,
    ) -> Result<MediaItem, UpstreamError>;

    async fn fetch_details(
        &self,
        id: i64,
        media_type: MediaType,
        language: &str,
    ) -> Result<MediaItem, UpstreamError>;
}

/// Returns the opaque id of an `id::` query.
pub fn parse_id_query(query: &str) -> Option<&str> {
    query
        .trim_start()
        .strip_prefix(ID_QUERY_PREFIX)
        .map(str::trim)
}

/// Drops items that have nothing to show in a poster slot.
pub fn poster_filter(items: Vec<MediaItem>) -> Vec<MediaItem> {
    items.into_iter().filter(MediaItem::has_poster).collect()
}

/// Runs the movie and tv lookups for one id concurrently and keeps whichever
/// succeeded, tagged with the type it was fetched as.
pub async fn search_by_id<A: TmdbApi + ?Sized>(
    api: &A,
    id: &str,
    language: &str,
) -> ResultPage {
    let (movie, tv) = tokio::join!(
        api.fetch_by_id(id, MediaType::Movie, language),
        api.fetch_by_id(id, MediaType::Tv, language),
    );
    let mut results = Vec::new();
    for (media_type, outcome) in [(MediaType::Movie, movie), (MediaType::Tv, tv)] {
        match outcome {
            Ok(mut item) => {
                item.media_type = Some(media_type);
                results.push(item);
            }
            Err(e) => tracing::debug!("id lookup for {} as {} failed: {}", id, media_type, e),
        }
    }
    ResultPage::single(poster_filter(results))
}
