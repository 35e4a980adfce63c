use serde::Deserialize;

use super::poster_filter;
use crate::models::{CastMember, Genre, MediaDetails, MediaItem, MediaType, ResultPage};
use crate::utils::non_empty;

const CAST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub(super) struct RawPage {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    results: Vec<RawMedia>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(super) struct RawMedia {
    id: i64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    #[serde(default)]
    original_language: String,
    #[serde(default)]
    adult: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawDetails {
    #[serde(flatten)]
    media: RawMedia,
    #[serde(default)]
    genres: Vec<Genre>,
    number_of_episodes: Option<u32>,
    number_of_seasons: Option<u32>,
    status: Option<String>,
    credits: Option<Credits>,
    videos: Option<Videos>,
    similar: Option<RawPage>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<RawCast>,
}

#[derive(Debug, Deserialize)]
struct RawCast {
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    site: String,
    #[serde(rename = "type")]
    video_type: String,
    key: String,
}

impl RawPage {
    pub(super) fn into_page(self) -> ResultPage {
        let results = self.results.into_iter().map(RawMedia::into_item).collect();
        ResultPage {
            page: self.page.max(1),
            results: poster_filter(results),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

impl RawMedia {
    pub(super) fn into_item(self) -> MediaItem {
        let title = [
            &self.title,
            &self.name,
            &self.original_title,
            &self.original_name,
        ]
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
        .cloned()
        .unwrap_or_default();
        let original_title = non_empty(self.original_title.or(self.original_name))
            .filter(|original| *original != title);
        let media_type = match self.media_type.as_deref() {
            Some("movie") => Some(MediaType::Movie),
            Some("tv") => Some(MediaType::Tv),
            _ => None,
        };

        MediaItem {
            id: self.id,
            media_type,
            title,
            original_title,
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            vote_average: self.vote_average,
            release_date: non_empty(self.release_date),
            first_air_date: non_empty(self.first_air_date),
            genre_ids: self.genre_ids,
            original_language: self.original_language,
            adult: self.adult,
            details: None,
        }
    }
}

impl RawDetails {
    pub(super) fn into_item(self) -> MediaItem {
        let cast = self
            .credits
            .map(|c| {
                c.cast
                    .into_iter()
                    .take(CAST_LIMIT)
                    .map(|m| CastMember {
                        name: m.name,
                        character: non_empty(m.character),
                        profile_path: non_empty(m.profile_path),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let trailer = self.videos.as_ref().and_then(select_trailer);
        let similar = self
            .similar
            .map(|p| p.into_page().results)
            .unwrap_or_default();

        let mut item = self.media.into_item();
        // Detail payloads carry full genre objects instead of ids.
        if item.genre_ids.is_empty() {
            item.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        item.details = Some(MediaDetails {
            genres: self.genres,
            cast,
            number_of_episodes: self.number_of_episodes,
            number_of_seasons: self.number_of_seasons,
            status: non_empty(self.status),
            trailer,
            similar,
        });
        item
    }
}

fn select_trailer(videos: &Videos) -> Option<String> {
    videos
        .results
        .iter()
        .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == "Trailer")
        .or_else(|| {
            videos
                .results
                .iter()
                .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == "Teaser")
        })
        .map(|v| format!("https://www.youtube.com/watch?v={}", v.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_results_without_poster() {
        let raw: RawPage = serde_json::from_value(json!({
            "page": 2,
            "total_pages": 10,
            "total_results": 200,
            "results": [
                { "id": 1, "title": "Kept", "poster_path": "/a.jpg" },
                { "id": 2, "title": "No poster", "poster_path": null },
                { "id": 3, "title": "Empty poster", "poster_path": "" },
                { "id": 4, "name": "Person", "media_type": "person", "profile_path": "/p.jpg" }
            ]
        }))
        .unwrap();
        let page = raw.into_page();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 1);
    }

    #[test]
    fn display_title_falls_back_through_names() {
        let raw: RawMedia = serde_json::from_value(json!({
            "id": 7,
            "name": "",
            "original_name": "Kaijuu",
            "first_air_date": "",
            "poster_path": "/k.jpg"
        }))
        .unwrap();
        let item = raw.into_item();
        assert_eq!(item.title, "Kaijuu");
        assert_eq!(item.original_title, None);
        assert_eq!(item.first_air_date, None);
    }

    #[test]
    fn keeps_original_title_only_when_different() {
        let raw: RawMedia = serde_json::from_value(json!({
            "id": 8,
            "media_type": "movie",
            "title": "Spirited Away",
            "original_title": "千と千尋の神隠し",
            "poster_path": "/s.jpg"
        }))
        .unwrap();
        let item = raw.into_item();
        assert_eq!(item.media_type, Some(MediaType::Movie));
        assert_eq!(item.original_title.as_deref(), Some("千と千尋の神隠し"));
    }

    #[test]
    fn maps_appended_details() {
        let raw: RawDetails = serde_json::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "original_name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "poster_path": "/got.jpg",
            "vote_average": 8.4,
            "original_language": "en",
            "genres": [{ "id": 10765, "name": "Sci-Fi & Fantasy" }],
            "number_of_episodes": 73,
            "number_of_seasons": 8,
            "status": "Ended",
            "credits": { "cast": [
                { "name": "Emilia Clarke", "character": "Daenerys", "profile_path": null }
            ] },
            "videos": { "results": [
                { "site": "YouTube", "type": "Teaser", "key": "tease" },
                { "site": "YouTube", "type": "Trailer", "key": "trail" }
            ] },
            "similar": { "page": 1, "results": [
                { "id": 1, "name": "Similar", "poster_path": "/s.jpg" },
                { "id": 2, "name": "Hidden", "poster_path": null }
            ] }
        }))
        .unwrap();
        let item = raw.into_item();
        let details = item.details.expect("details");
        assert_eq!(item.genre_ids, vec![10765]);
        assert_eq!(details.number_of_episodes, Some(73));
        assert_eq!(details.cast[0].name, "Emilia Clarke");
        assert_eq!(
            details.trailer.as_deref(),
            Some("https://www.youtube.com/watch?v=trail")
        );
        assert_eq!(details.similar.len(), 1);
    }
}
