use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lookup::{genre_name, language_name};
use crate::utils::{format_rating, image_url, release_year, ImageSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Categories offered for this media type, in display order.
    pub fn categories(&self) -> &'static [Category] {
        match self {
            MediaType::Movie => &[
                Category::Popular,
                Category::TopRated,
                Category::Upcoming,
                Category::NowPlaying,
            ],
            MediaType::Tv => &[Category::AiringToday, Category::Popular, Category::TopRated],
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(anyhow::anyhow!("media type must be 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
    AiringToday,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
            Category::NowPlaying => "now_playing",
            Category::AiringToday => "airing_today",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Popular => "Popular",
            Category::TopRated => "Top Rated",
            Category::Upcoming => "Upcoming",
            Category::NowPlaying => "Now Playing",
            Category::AiringToday => "Airing Today",
        }
    }

    pub fn supports(&self, media_type: MediaType) -> bool {
        media_type.categories().contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "popular" => Ok(Category::Popular),
            "top_rated" => Ok(Category::TopRated),
            "upcoming" => Ok(Category::Upcoming),
            "now_playing" => Ok(Category::NowPlaying),
            "airing_today" => Ok(Category::AiringToday),
            other => Err(anyhow::anyhow!("unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingScope {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingScope::All => "all",
            TrendingScope::Movie => "movie",
            TrendingScope::Tv => "tv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaItem {
    pub id: i64,
    pub media_type: Option<MediaType>,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub genre_ids: Vec<u32>,
    pub original_language: String,
    pub adult: bool,
    pub details: Option<MediaDetails>,
}

impl MediaItem {
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// Explicit type when upstream sent one, otherwise a first-air date means TV.
    pub fn resolved_media_type(&self) -> MediaType {
        match self.media_type {
            Some(t) => t,
            None if self.first_air_date.is_some() => MediaType::Tv,
            None => MediaType::Movie,
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
    }

    pub fn genre_names(&self) -> Vec<String> {
        match &self.details {
            Some(d) if !d.genres.is_empty() => d.genres.iter().map(|g| g.name.clone()).collect(),
            _ => self
                .genre_ids
                .iter()
                .map(|id| genre_name(*id).to_string())
                .collect(),
        }
    }

    pub fn card(&self) -> MediaCard {
        MediaCard {
            id: self.id,
            media_type: self.resolved_media_type(),
            title: self.title.clone(),
            year: self.date().and_then(release_year),
            rating: format_rating(self.vote_average),
            language: language_name(&self.original_language),
            genres: self.genre_names(),
            overview: self.overview.clone(),
            poster_url: self
                .poster_path
                .as_deref()
                .map(|p| image_url(p, ImageSize::Thumbnail)),
            backdrop_url: self
                .backdrop_path
                .as_deref()
                .map(|p| image_url(p, ImageSize::Original)),
            adult: self.adult,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MediaDetails {
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
    pub number_of_episodes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub status: Option<String>,
    pub trailer: Option<String>,
    pub similar: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub page: u32,
    pub results: Vec<MediaItem>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl ResultPage {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    /// Wraps an ad-hoc list (e.g. id lookups) as a single page.
    pub fn single(results: Vec<MediaItem>) -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_results: results.len() as u32,
            results,
        }
    }
}

/// What a grid card or dropdown row shows for one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaCard {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<i32>,
    pub rating: String,
    pub language: String,
    pub genres: Vec<String>,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub adult: bool,
}
