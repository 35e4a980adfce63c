use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::wire::{RawDetails, RawMedia, RawPage};
use super::{parse_id_query, search_by_id, Operation, TmdbApi, UpstreamError};
use crate::config::Config;
use crate::models::{Category, MediaItem, MediaType, ResultPage, TimeWindow, TrendingScope};

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> anyhow::Result<Self> {
        let user_agent = format!("cinebrowse/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build TMDB HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(&config.api_url, &config.api_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        path_and_query: &str,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        debug!("GET {} ({})", url, operation);
        let res = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| UpstreamError::new(operation, None, format!("request failed: {e}")))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| {
            UpstreamError::new(
                operation,
                Some(status.as_u16()),
                format!("reading body failed: {e}"),
            )
        })?;
        if !status.is_success() {
            return Err(UpstreamError::new(operation, Some(status.as_u16()), text));
        }
        serde_json::from_str(&text).map_err(|e| {
            UpstreamError::new(
                operation,
                Some(status.as_u16()),
                format!("JSON parse failed: {e}"),
            )
        })
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn list_by_category(
        &self,
        category: Category,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        let path = format!(
            "/{media_type}/{category}?language={}&page={page}",
            urlencoding::encode(language)
        );
        let raw: RawPage = self.get_json(Operation::ListByCategory, &path).await?;
        Ok(raw.into_page())
    }

    async fn list_trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        let path = format!(
            "/trending/{}/{}?language={}",
            scope.as_str(),
            window.as_str(),
            urlencoding::encode(language)
        );
        let raw: RawPage = self.get_json(Operation::ListTrending, &path).await?;
        Ok(raw.into_page())
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        if let Some(id) = parse_id_query(query) {
            return Ok(search_by_id(self, id, language).await);
        }
        let path = format!(
            "/search/multi?query={}&language={}&page={page}",
            urlencoding::encode(query),
            urlencoding::encode(language)
        );
        let raw: RawPage = self.get_json(Operation::Search, &path).await?;
        Ok(raw.into_page())
    }

    async fn fetch_by_id(
        &self,
        id: &str,
        media_type: MediaType,
        language: &str,
    ) -> Result<MediaItem, UpstreamError> {
        let path = format!(
            "/{media_type}/{}?language={}",
            urlencoding::encode(id),
            urlencoding::encode(language)
        );
        let raw: RawMedia = self.get_json(Operation::FetchById, &path).await?;
        Ok(raw.into_item())
    }

    async fn fetch_details(
        &self,
        id: i64,
        media_type: MediaType,
        language: &str,
    ) -> Result<MediaItem, UpstreamError> {
        let path = format!(
            "/{media_type}/{id}?language={}&append_to_response=credits,videos,similar",
            urlencoding::encode(language)
        );
        let raw: RawDetails = self.get_json(Operation::FetchDetails, &path).await?;
        let mut item = raw.into_item();
        item.media_type = Some(media_type);
        Ok(item)
    }
}
