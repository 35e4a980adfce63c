use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::LatestTask;
use crate::models::{MediaItem, MediaType};
use crate::tmdb::{TmdbApi, UpstreamError};
use crate::utils::{format_rating, image_url, ImageSize};

pub const MIN_QUERY_LEN: usize = 2;
pub const DEBOUNCE: Duration = Duration::from_millis(500);
pub const DROPDOWN_LIMIT: usize = 10;

/// Inputs shorter than this never reach the network.
pub fn is_searchable(input: &str) -> bool {
    input.trim().chars().count() >= MIN_QUERY_LEN
}

#[derive(Debug, PartialEq)]
pub enum Dropdown<'a> {
    Hidden,
    Loading,
    NoResults,
    Results(&'a [MediaItem]),
}

/// One dropdown line: small backdrop, title, date and rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownRow {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub date: Option<String>,
    pub rating: String,
    pub image_url: Option<String>,
}

impl DropdownRow {
    pub fn new(item: &MediaItem) -> Self {
        Self {
            id: item.id,
            media_type: item.resolved_media_type(),
            title: item.title.clone(),
            date: item.date().map(str::to_string),
            rating: format_rating(item.vote_average),
            image_url: item
                .backdrop_path
                .as_deref()
                .map(|p| image_url(p, ImageSize::Small)),
        }
    }
}

pub struct SearchBox {
    api: Arc<dyn TmdbApi>,
    language: String,
    input: String,
    results: Vec<MediaItem>,
    task: LatestTask<Result<Vec<MediaItem>, UpstreamError>>,
}

impl SearchBox {
    pub fn new(api: Arc<dyn TmdbApi>, language: impl Into<String>) -> Self {
        Self {
            api,
            language: language.into(),
            input: String::new(),
            results: Vec::new(),
            task: LatestTask::new(),
        }
    }

    pub fn input_value(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_pending()
    }

    pub fn results(&self) -> &[MediaItem] {
        &self.results
    }

    /// One keystroke. Always clears the pending timer; schedules a new search
    /// only for queries of at least two characters.
    pub fn input(&mut self, value: &str) {
        self.input = value.to_string();
        self.task.cancel();

        if !is_searchable(value) {
            self.results.clear();
            return;
        }

        let api = self.api.clone();
        let language = self.language.clone();
        let query = value.trim().to_string();
        let seq = self.task.spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            api.search(&query, 1, &language)
                .await
                .map(|page| page.results)
        });
        debug!("Scheduled search #{} for '{}'", seq, value.trim());
    }

    /// Waits for the pending search (if any) and applies its results.
    pub async fn settle(&mut self) -> &[MediaItem] {
        if let Some(outcome) = self.task.next().await {
            self.results = match outcome {
                Ok(items) => items,
                Err(e) => {
                    warn!("Search error: {}", e);
                    Vec::new()
                }
            };
        }
        &self.results
    }

    pub fn dropdown(&self) -> Dropdown<'_> {
        if !is_searchable(&self.input) {
            return Dropdown::Hidden;
        }
        if self.task.is_pending() {
            return Dropdown::Loading;
        }
        if self.results.is_empty() {
            return Dropdown::NoResults;
        }
        let shown = self.results.len().min(DROPDOWN_LIMIT);
        Dropdown::Results(&self.results[..shown])
    }

    /// Rows for the visible dropdown results; empty in every other state.
    pub fn rows(&self) -> Vec<DropdownRow> {
        match self.dropdown() {
            Dropdown::Results(items) => items.iter().map(DropdownRow::new).collect(),
            _ => Vec::new(),
        }
    }
}
