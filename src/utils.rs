use chrono::{Datelike, NaiveDate};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Search dropdown row backdrops.
    Small,
    /// Grid cards and carousel slots.
    Thumbnail,
    /// Hero and overlay backdrops.
    Original,
}

impl ImageSize {
    fn as_path(&self) -> &'static str {
        match self {
            ImageSize::Small => "w200",
            ImageSize::Thumbnail => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Resolves an upstream image path against the CDN. Paths arrive with a
/// leading slash but some callers strip it, so both forms are accepted.
pub fn image_url(path: &str, size: ImageSize) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        format!("{IMAGE_BASE}/{}{path}", size.as_path())
    } else {
        format!("{IMAGE_BASE}/{}/{path}", size.as_path())
    }
}

/// One decimal, halves rounded away from zero.
pub fn format_rating(vote_average: f64) -> String {
    let rounded = (vote_average.clamp(0.0, 10.0) * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

pub fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Upstream sends `""` for unknown dates and paths.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
