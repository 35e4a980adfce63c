use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::LatestTask;
use crate::models::{Category, MediaType, ResultPage};
use crate::pagination::{max_pages, PaginationControls};
use crate::tmdb::{TmdbApi, UpstreamError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrowseError {
    #[error("category '{category}' is not available for {media_type}")]
    UnsupportedCategory {
        category: Category,
        media_type: MediaType,
    },
    #[error("page {0} is out of range")]
    PageOutOfRange(u32),
}

type Outcome = (Category, u32, Result<ResultPage, UpstreamError>);

/// Category filter plus page cursor for one movies or TV listing.
pub struct BrowseView {
    api: Arc<dyn TmdbApi>,
    media_type: MediaType,
    language: String,
    category: Category,
    page: u32,
    results: Option<ResultPage>,
    // Category and page the current results belong to.
    shown: Option<(Category, u32)>,
    last_error: Option<UpstreamError>,
    task: LatestTask<Outcome>,
}

impl BrowseView {
    pub fn new(api: Arc<dyn TmdbApi>, media_type: MediaType, language: impl Into<String>) -> Self {
        Self {
            api,
            media_type,
            language: language.into(),
            category: Category::Popular,
            page: 1,
            results: None,
            shown: None,
            last_error: None,
            task: LatestTask::new(),
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_pending()
    }

    pub fn results(&self) -> Option<&ResultPage> {
        self.results.as_ref()
    }

    pub fn last_error(&self) -> Option<&UpstreamError> {
        self.last_error.as_ref()
    }

    pub fn pagination(&self) -> PaginationControls {
        let total = self.results.as_ref().map(|r| r.total_pages).unwrap_or(0);
        PaginationControls::new(self.page, total)
    }

    /// Issues the fetch for the current category and page.
    pub fn load(&mut self) {
        let api = self.api.clone();
        let (category, page, media_type) = (self.category, self.page, self.media_type);
        let language = self.language.clone();
        let seq = self.task.spawn(async move {
            let res = api
                .list_by_category(category, media_type, page, &language)
                .await;
            (category, page, res)
        });
        info!(
            "Loading {} {} page {} (request #{})",
            media_type, category, page, seq
        );
    }

    /// Switches category and starts over from page 1.
    pub fn select_category(&mut self, category: Category) -> Result<(), BrowseError> {
        if !category.supports(self.media_type) {
            return Err(BrowseError::UnsupportedCategory {
                category,
                media_type: self.media_type,
            });
        }
        if category == self.category {
            return Ok(());
        }
        self.category = category;
        self.page = 1;
        self.load();
        Ok(())
    }

    pub fn set_page(&mut self, page: u32) -> Result<(), BrowseError> {
        let known_max = self
            .results
            .as_ref()
            .map(|r| max_pages(r.total_pages))
            .filter(|max| *max > 0);
        if page == 0 || known_max.is_some_and(|max| page > max) {
            return Err(BrowseError::PageOutOfRange(page));
        }
        if page == self.page {
            return Ok(());
        }
        self.page = page;
        self.load();
        Ok(())
    }

    /// Waits for the latest request and applies it. Superseded responses never
    /// reach the view. Failures keep the previous results and move the cursor
    /// back to them.
    pub async fn settle(&mut self) -> Option<&ResultPage> {
        if let Some(outcome) = self.task.next().await {
            self.apply(outcome);
        }
        self.results.as_ref()
    }

    fn apply(&mut self, (category, page, res): Outcome) {
        match res {
            Ok(results) => {
                info!(
                    "Loaded {} {} page {}: {} results",
                    self.media_type,
                    category,
                    page,
                    results.results.len()
                );
                self.results = Some(results);
                self.shown = Some((category, page));
                self.last_error = None;
            }
            Err(e) => {
                warn!(
                    "Failed to fetch {} {} page {}: {}",
                    self.media_type, category, page, e
                );
                if let Some((shown_category, shown_page)) = self.shown {
                    self.category = shown_category;
                    self.page = shown_page;
                }
                self.last_error = Some(e);
            }
        }
    }
}
