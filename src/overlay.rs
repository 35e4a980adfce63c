//! Detail overlay bound to the `watchId` query parameter.
//!
//! Binding contract: the overlay is open exactly when the current history
//! entry carries a `watchId` naming a mounted item. Opening pushes an entry,
//! closing pops it (or strips the parameter in place when the page was
//! entered through a shared link), and back/forward simply re-derive the
//! overlay from whatever entry is current.
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::fetch::LatestTask;
use crate::lookup::language_name;
use crate::models::{MediaItem, MediaType};
use crate::tmdb::{TmdbApi, UpstreamError};
use crate::utils::{format_rating, image_url, release_year, ImageSize};

pub const WATCH_PARAM: &str = "watchId";
const CAST_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    query: Vec<(String, String)>,
    // Which of two same-id items was activated; never rendered to the URL.
    watch_type: Option<MediaType>,
}

impl Route {
    pub fn parse(url: &str) -> Self {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(k), decode(v))
            })
            .collect();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query,
            watch_type: None,
        }
    }

    pub fn watch_id(&self) -> Option<i64> {
        self.query
            .iter()
            .find(|(k, _)| k == WATCH_PARAM)
            .and_then(|(_, v)| v.trim().parse().ok())
    }

    pub fn with_watch_id(&self, id: Option<i64>) -> Self {
        let mut query: Vec<_> = self
            .query
            .iter()
            .filter(|(k, _)| k != WATCH_PARAM)
            .cloned()
            .collect();
        if let Some(id) = id {
            query.push((WATCH_PARAM.to_string(), id.to_string()));
        }
        Self {
            path: self.path.clone(),
            query,
            watch_type: None,
        }
    }

    pub fn with_watch(&self, media_type: MediaType, id: i64) -> Self {
        let mut route = self.with_watch_id(Some(id));
        route.watch_type = Some(media_type);
        route
    }

    pub fn watch_type(&self) -> Option<MediaType> {
        self.watch_type
    }

    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

fn decode(s: &str) -> String {
    match urlencoding::decode(s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.cursor]
    }

    pub fn previous(&self) -> Option<&Route> {
        self.cursor.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Drops any forward entries, like a browser does.
    pub fn push(&mut self, route: Route) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(route);
        self.cursor += 1;
    }

    pub fn replace(&mut self, route: Route) {
        self.entries[self.cursor] = route;
    }

    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Page scroll flag shared between the overlay and whatever renders the page.
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    locked: Arc<AtomicBool>,
}

impl PageScroll {
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    fn lock(&self) -> ScrollLock {
        self.locked.store(true, Ordering::SeqCst);
        ScrollLock {
            locked: self.locked.clone(),
        }
    }
}

/// Releases the page scroll when dropped, whichever way the overlay closes.
#[derive(Debug)]
pub struct ScrollLock {
    locked: Arc<AtomicBool>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

type ItemKey = (MediaType, i64);

#[derive(Debug)]
struct OpenOverlay {
    key: ItemKey,
    _scroll: ScrollLock,
}

pub struct DetailOverlay {
    api: Arc<dyn TmdbApi>,
    language: String,
    history: History,
    scroll: PageScroll,
    // Mount order decides which item a bare `watchId` resolves to.
    mounted: Vec<MediaItem>,
    details: HashMap<ItemKey, MediaItem>,
    open: Option<OpenOverlay>,
    task: LatestTask<(ItemKey, Result<MediaItem, UpstreamError>)>,
}

fn key_of(item: &MediaItem) -> ItemKey {
    (item.resolved_media_type(), item.id)
}

impl DetailOverlay {
    pub fn new(
        api: Arc<dyn TmdbApi>,
        language: impl Into<String>,
        initial_url: &str,
        scroll: PageScroll,
    ) -> Self {
        Self {
            api,
            language: language.into(),
            history: History::new(Route::parse(initial_url)),
            scroll,
            mounted: Vec::new(),
            details: HashMap::new(),
            open: None,
            task: LatestTask::new(),
        }
    }

    /// Registers the cards currently on screen; a `watchId` naming one of
    /// them (e.g. from a shared link) opens the overlay.
    pub fn mount(&mut self, items: &[MediaItem]) {
        for item in items {
            let key = key_of(item);
            match self.mounted.iter_mut().find(|m| key_of(m) == key) {
                Some(existing) => *existing = item.clone(),
                None => self.mounted.push(item.clone()),
            }
        }
        self.sync();
    }

    fn mounted_item(&self, key: ItemKey) -> Option<&MediaItem> {
        self.mounted.iter().find(|m| key_of(m) == key)
    }

    /// The route's type hint wins; otherwise the first mounted item with the id.
    fn resolve(&self, route: &Route) -> Option<ItemKey> {
        let id = route.watch_id()?;
        if let Some(key) = route.watch_type().map(|t| (t, id)) {
            if self.mounted_item(key).is_some() {
                return Some(key);
            }
        }
        self.mounted.iter().map(key_of).find(|(_, mid)| *mid == id)
    }

    pub fn current_url(&self) -> String {
        self.history.current().to_url()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_id(&self) -> Option<i64> {
        self.open_key().map(|(_, id)| id)
    }

    pub fn open_key(&self) -> Option<(MediaType, i64)> {
        self.open.as_ref().map(|o| o.key)
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_pending()
    }

    pub fn activate(&mut self, media_type: MediaType, id: i64) -> bool {
        let key = (media_type, id);
        if self.mounted_item(key).is_none() {
            warn!("Ignoring activation of unknown {} {}", media_type, id);
            return false;
        }
        if self.open_key() == Some(key) {
            return true;
        }
        let route = self.history.current().with_watch(media_type, id);
        self.history.push(route);
        self.sync();
        true
    }

    pub fn close(&mut self) {
        if self.open.is_none() {
            return;
        }
        let stripped = self.history.current().with_watch_id(None);
        if self.history.previous() == Some(&stripped) {
            self.history.back();
        } else {
            self.history.replace(stripped);
        }
        self.sync();
    }

    pub fn handle_key(&mut self, key: Key) {
        if key == Key::Escape {
            self.close();
        }
    }

    pub fn back(&mut self) {
        if self.history.back() {
            self.sync();
        }
    }

    pub fn forward(&mut self) {
        if self.history.forward() {
            self.sync();
        }
    }

    fn sync(&mut self) {
        let wanted = self.resolve(self.history.current());
        if wanted == self.open_key() {
            return;
        }
        // Dropping the previous state releases its scroll lock first.
        self.open = None;
        self.task.cancel();
        if let Some(key) = wanted {
            info!("Opening details for {} {}", key.0, key.1);
            self.open = Some(OpenOverlay {
                key,
                _scroll: self.scroll.lock(),
            });
            self.request_details(key);
        }
    }

    // Must run inside a Tokio runtime; the fetch is a spawned task.
    fn request_details(&mut self, key: ItemKey) {
        if self.details.contains_key(&key) {
            return;
        }
        let api = self.api.clone();
        let language = self.language.clone();
        let seq = self.task.spawn(async move {
            let (media_type, id) = key;
            (key, api.fetch_details(id, media_type, &language).await)
        });
        debug!("Requested details for {} {} (#{})", key.0, key.1, seq);
    }

    /// Waits for the pending details fetch, if any, and caches a success.
    /// Fetches cancelled by closing the overlay never arrive here.
    pub async fn settle(&mut self) -> Option<&MediaItem> {
        if let Some((key, outcome)) = self.task.next().await {
            match outcome {
                Ok(details) => {
                    self.details.insert(key, details);
                }
                Err(e) => warn!("Error fetching media details: {}", e),
            }
        }
        self.open_item()
    }

    /// The open item, with extended details once they arrived.
    pub fn open_item(&self) -> Option<&MediaItem> {
        let key = self.open_key()?;
        self.details.get(&key).or_else(|| self.mounted_item(key))
    }

    pub fn view(&self) -> Option<DetailView> {
        let basic = self.mounted_item(self.open_key()?)?;
        let shown = self.open_item()?;
        Some(DetailView::new(basic, shown))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub rating: String,
    pub overview: String,
    pub adult: bool,
    pub language: String,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
    pub first_air_date: Option<String>,
    pub episodes: Option<u32>,
    pub seasons: Option<u32>,
    pub release_date: Option<String>,
    pub cast: Vec<String>,
    pub trailer: Option<String>,
}

impl DetailView {
    /// `basic` is the card the overlay was opened from, `shown` the same item
    /// with details when they are available.
    pub fn new(basic: &MediaItem, shown: &MediaItem) -> Self {
        let media_type = shown.resolved_media_type();
        let details = shown.details.as_ref();
        let is_tv = media_type == MediaType::Tv;
        Self {
            id: shown.id,
            media_type,
            title: shown.title.clone(),
            original_title: shown.original_title.clone(),
            year: shown.date().and_then(release_year),
            rating: format_rating(shown.vote_average),
            overview: shown.overview.clone(),
            adult: shown.adult,
            language: language_name(&shown.original_language),
            genres: basic.genre_names(),
            image_url: basic
                .backdrop_path
                .as_deref()
                .or(basic.poster_path.as_deref())
                .map(|p| image_url(p, ImageSize::Original)),
            first_air_date: is_tv.then(|| shown.first_air_date.clone()).flatten(),
            episodes: details.and_then(|d| d.number_of_episodes).filter(|_| is_tv),
            seasons: details.and_then(|d| d.number_of_seasons).filter(|_| is_tv),
            release_date: (!is_tv).then(|| shown.release_date.clone()).flatten(),
            cast: details
                .map(|d| {
                    d.cast
                        .iter()
                        .take(CAST_SHOWN)
                        .map(|c| c.name.clone())
                        .collect()
                })
                .unwrap_or_default(),
            trailer: details.and_then(|d| d.trailer.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_round_trips_watch_id_and_keeps_other_params() {
        let route = Route::parse("/movies?lang=fr&watchId=550");
        assert_eq!(route.path, "/movies");
        assert_eq!(route.watch_id(), Some(550));
        let closed = route.with_watch_id(None);
        assert_eq!(
            closed.with_watch(MediaType::Tv, 550).to_url(),
            "/movies?lang=fr&watchId=550"
        );
        assert_eq!(closed.to_url(), "/movies?lang=fr");
        assert_eq!(closed.with_watch_id(Some(7)).to_url(), "/movies?lang=fr&watchId=7");
    }

    #[test]
    fn malformed_watch_id_is_ignored() {
        assert_eq!(Route::parse("/?watchId=abc").watch_id(), None);
        assert_eq!(Route::parse("").path, "/");
    }

    #[test]
    fn push_discards_forward_entries() {
        let mut history = History::new(Route::parse("/"));
        history.push(Route::parse("/a"));
        history.push(Route::parse("/b"));
        assert!(history.back());
        history.push(Route::parse("/c"));
        assert_eq!(history.len(), 3);
        assert!(!history.forward());
        assert_eq!(history.current().to_url(), "/c");
    }

    #[test]
    fn scroll_lock_releases_on_drop() {
        let scroll = PageScroll::default();
        let lock = scroll.lock();
        assert!(scroll.is_locked());
        drop(lock);
        assert!(!scroll.is_locked());
    }
}
