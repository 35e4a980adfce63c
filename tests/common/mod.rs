#![allow(dead_code)]

use async_trait::async_trait;
use cinebrowse::models::{
    CastMember, Category, Genre, MediaDetails, MediaItem, MediaType, ResultPage, TimeWindow,
    TrendingScope,
};
use cinebrowse::tmdb::{Operation, TmdbApi, UpstreamError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn item(id: i64, title: &str, media_type: MediaType) -> MediaItem {
    let date = Some("2024-05-17".to_string());
    MediaItem {
        id,
        media_type: Some(media_type),
        title: title.to_string(),
        original_title: None,
        overview: format!("{title} overview"),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: Some(format!("/backdrop-{id}.jpg")),
        vote_average: 7.25,
        release_date: (media_type == MediaType::Movie).then(|| date.clone()).flatten(),
        first_air_date: (media_type == MediaType::Tv).then_some(date).flatten(),
        genre_ids: vec![18],
        original_language: "en".to_string(),
        adult: false,
        details: None,
    }
}

pub fn page_of(page: u32, total_pages: u32, results: Vec<MediaItem>) -> ResultPage {
    ResultPage {
        page,
        total_results: total_pages * 20,
        total_pages,
        results,
    }
}

/// Scripted upstream that records every call it receives.
#[derive(Default)]
pub struct FakeTmdb {
    calls: Mutex<Vec<String>>,
    page_delays: HashMap<u32, Duration>,
    details_delay: Option<Duration>,
    pub fail: AtomicBool,
}

impl FakeTmdb {
    pub fn with_page_delays(delays: &[(u32, u64)]) -> Self {
        Self {
            page_delays: delays
                .iter()
                .map(|(page, ms)| (*page, Duration::from_millis(*ms)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_details_delay(ms: u64) -> Self {
        Self {
            details_delay: Some(Duration::from_millis(ms)),
            ..Self::default()
        }
    }

    pub fn fail_from_now(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(&self, operation: Operation) -> Option<UpstreamError> {
        self.fail
            .load(Ordering::SeqCst)
            .then(|| UpstreamError::new(operation, Some(500), "internal error"))
    }
}

#[async_trait]
impl TmdbApi for FakeTmdb {
    async fn list_by_category(
        &self,
        category: Category,
        media_type: MediaType,
        page: u32,
        language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        self.record(format!("list {media_type} {category} {page} {language}"));
        if let Some(delay) = self.page_delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(e) = self.failure(Operation::ListByCategory) {
            return Err(e);
        }
        let title = format!("{category} p{page}");
        Ok(page_of(
            page,
            40,
            vec![item(page as i64 * 100 + 1, &title, media_type)],
        ))
    }

    async fn list_trending(
        &self,
        scope: TrendingScope,
        window: TimeWindow,
        language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        self.record(format!(
            "trending {} {} {language}",
            scope.as_str(),
            window.as_str()
        ));
        if let Some(e) = self.failure(Operation::ListTrending) {
            return Err(e);
        }
        Ok(page_of(1, 1, vec![item(7, "Trending", MediaType::Movie)]))
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        _language: &str,
    ) -> Result<ResultPage, UpstreamError> {
        self.record(format!("search {query} {page}"));
        if query == "boom" {
            return Err(UpstreamError::new(Operation::Search, Some(503), "unavailable"));
        }
        if query.starts_with("nothing") {
            return Ok(ResultPage::empty());
        }
        let results = (1..=12)
            .map(|i| item(i, &format!("{query} {i}"), MediaType::Movie))
            .collect();
        Ok(page_of(page, 1, results))
    }

    async fn fetch_by_id(
        &self,
        id: &str,
        media_type: MediaType,
        _language: &str,
    ) -> Result<MediaItem, UpstreamError> {
        self.record(format!("by_id {media_type} {id}"));
        match (media_type, id.parse::<i64>()) {
            (MediaType::Movie, Ok(id)) => Ok(item(id, "By id", media_type)),
            _ => Err(UpstreamError::new(Operation::FetchById, Some(404), "not found")),
        }
    }

    async fn fetch_details(
        &self,
        id: i64,
        media_type: MediaType,
        _language: &str,
    ) -> Result<MediaItem, UpstreamError> {
        self.record(format!("details {media_type} {id}"));
        if let Some(delay) = self.details_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.failure(Operation::FetchDetails) {
            return Err(e);
        }
        let mut detailed = item(id, &format!("Detailed {id}"), media_type);
        let is_tv = media_type == MediaType::Tv;
        detailed.details = Some(MediaDetails {
            genres: vec![
                Genre {
                    id: 18,
                    name: "Drama".to_string(),
                },
                Genre {
                    id: 9648,
                    name: "Mystery".to_string(),
                },
            ],
            cast: (1..=7)
                .map(|i| CastMember {
                    name: format!("Actor {i}"),
                    character: Some(format!("Role {i}")),
                    profile_path: None,
                })
                .collect(),
            number_of_episodes: is_tv.then_some(8),
            number_of_seasons: is_tv.then_some(1),
            status: Some("Ended".to_string()),
            trailer: Some("https://www.youtube.com/watch?v=abc".to_string()),
            similar: Vec::new(),
        });
        Ok(detailed)
    }
}
