//! Compiled-in genre and language tables.
use once_cell::sync::Lazy;
use std::collections::HashMap;

static GENRES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // movie
        (28, "Action"),
        (12, "Adventure"),
        (16, "Animation"),
        (35, "Comedy"),
        (80, "Crime"),
        (99, "Documentary"),
        (18, "Drama"),
        (10751, "Family"),
        (14, "Fantasy"),
        (36, "History"),
        (27, "Horror"),
        (10402, "Music"),
        (9648, "Mystery"),
        (10749, "Romance"),
        (878, "Science Fiction"),
        (10770, "TV Movie"),
        (53, "Thriller"),
        (10752, "War"),
        (37, "Western"),
        // tv
        (10759, "Action & Adventure"),
        (10762, "Kids"),
        (10763, "News"),
        (10764, "Reality"),
        (10765, "Sci-Fi & Fantasy"),
        (10766, "Soap"),
        (10767, "Talk"),
        (10768, "War & Politics"),
    ])
});

static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh", "Chinese"),
        ("hi", "Hindi"),
        ("ru", "Russian"),
        ("pt", "Portuguese"),
        ("nl", "Dutch"),
        ("tl", "Tagalog"),
        ("tr", "Turkish"),
        ("pl", "Polish"),
        ("ar", "Arabic"),
        ("af", "Afrikaans"),
        ("am", "Amharic"),
        ("bg", "Bulgarian"),
        ("bn", "Bengali"),
        ("cs", "Czech"),
        ("da", "Danish"),
        ("el", "Greek"),
        ("fa", "Persian"),
        ("fi", "Finnish"),
        ("he", "Hebrew"),
        ("hr", "Croatian"),
        ("hu", "Hungarian"),
        ("id", "Indonesian"),
        ("ms", "Malay"),
        ("no", "Norwegian"),
        ("ro", "Romanian"),
        ("sk", "Slovak"),
        ("sl", "Slovenian"),
        ("sv", "Swedish"),
        ("th", "Thai"),
        ("uk", "Ukrainian"),
        ("ur", "Urdu"),
        ("vi", "Vietnamese"),
    ])
});

pub fn genre_name(id: u32) -> &'static str {
    GENRES.get(&id).copied().unwrap_or("Unknown")
}

pub fn language_name(code: &str) -> String {
    let lower = code.trim().to_lowercase();
    match LANGUAGES.get(lower.as_str()) {
        Some(name) => name.to_string(),
        None => code.trim().to_uppercase(),
    }
}
