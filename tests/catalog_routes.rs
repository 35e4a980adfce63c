mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cinebrowse::app::{build_router, AppState};
use cinebrowse::tmdb::TmdbApi;
use common::FakeTmdb;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app_with(fake: Arc<FakeTmdb>) -> Router {
    let tmdb: Arc<dyn TmdbApi> = fake;
    build_router(AppState {
        tmdb,
        language: "en-US".to_string(),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_check_responds_ok() {
    let app = app_with(Arc::new(FakeTmdb::default()));
    let res = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn lists_categories_per_media_type() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake.clone()), "/api/categories/tv").await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["value"].as_str())
        .collect();
    assert!(values.contains(&"airing_today"));
    assert!(!values.contains(&"upcoming"));
    assert_eq!(body[0]["label"], "Airing Today");

    let (status, _) = get(app_with(fake.clone()), "/api/categories/music").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn browse_returns_cards_and_pagination() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(
        app_with(fake.clone()),
        "/api/browse/movie/top_rated?page=2&language=fr-FR",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.calls(), vec!["list movie top_rated 2 fr-FR"]);

    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 40);
    let card = &body["results"][0];
    assert_eq!(card["title"], "top_rated p2");
    assert_eq!(card["year"], 2024);
    assert_eq!(card["rating"], "7.3");
    assert_eq!(card["language"], "English");
    assert_eq!(card["genres"][0], "Drama");
    assert_eq!(
        card["poster_url"],
        "https://image.tmdb.org/t/p/w500/poster-201.jpg"
    );

    let pagination = &body["pagination"];
    assert_eq!(pagination["pages"], serde_json::json!([1, 2, 3, 4, 5]));
    assert_eq!(pagination["prev_enabled"], true);
    assert_eq!(pagination["last"], 40);
}

#[tokio::test]
async fn browse_defaults_to_first_page_and_server_language() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake.clone()), "/api/browse/tv/airing_today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.calls(), vec!["list tv airing_today 1 en-US"]);
    assert_eq!(body["pagination"]["first_enabled"], false);
}

#[tokio::test]
async fn browse_rejects_unsupported_combinations() {
    let fake = Arc::new(FakeTmdb::default());
    for uri in [
        "/api/browse/tv/upcoming",
        "/api/browse/movie/airing_today",
        "/api/browse/books/popular",
        "/api/browse/movie/latest",
        "/api/browse/movie/popular?page=0",
    ] {
        let (status, body) = get(app_with(fake.clone()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status"], "error", "{uri}");
    }
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let fake = Arc::new(FakeTmdb::default());
    fake.fail_from_now();
    let (status, body) = get(app_with(fake.clone()), "/api/browse/movie/popular").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("list_by_category"), "{message}");
    assert!(message.contains("500"), "{message}");
}

#[tokio::test]
async fn short_search_queries_skip_upstream() {
    let fake = Arc::new(FakeTmdb::default());
    for uri in ["/api/search", "/api/search?query=a", "/api/search?query=%20b%20"] {
        let (status, body) = get(app_with(fake.clone()), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"], serde_json::json!([]));
        assert_eq!(body["total_results"], 0);
    }
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn search_trims_the_query() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake.clone()), "/api/search?query=%20%20dune%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.calls(), vec!["search dune 1"]);
    assert_eq!(body["results"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn trending_defaults_to_all_and_day() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake.clone()), "/api/trending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["title"], "Trending");

    let (status, _) = get(app_with(fake.clone()), "/api/trending?scope=tv&window=week").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        fake.calls(),
        vec!["trending all day en-US", "trending tv week en-US"]
    );

    let (status, _) = get(app_with(fake.clone()), "/api/trending?window=month").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn details_project_tv_fields() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake.clone()), "/api/details/tv/1399").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.calls(), vec!["details tv 1399"]);
    assert_eq!(body["title"], "Detailed 1399");
    assert_eq!(body["media_type"], "tv");
    assert_eq!(body["episodes"], 8);
    assert_eq!(body["seasons"], 1);
    assert_eq!(body["first_air_date"], "2024-05-17");
    assert_eq!(body["release_date"], Value::Null);
    assert_eq!(body["cast"].as_array().unwrap().len(), 5);
    assert_eq!(body["genres"], serde_json::json!(["Drama", "Mystery"]));
    assert_eq!(
        body["image_url"],
        "https://image.tmdb.org/t/p/original/backdrop-1399.jpg"
    );
}

#[tokio::test]
async fn details_project_movie_fields() {
    let fake = Arc::new(FakeTmdb::default());
    let (status, body) = get(app_with(fake), "/api/details/movie/550").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["release_date"], "2024-05-17");
    assert_eq!(body["episodes"], Value::Null);
    assert_eq!(body["trailer"], "https://www.youtube.com/watch?v=abc");
}
