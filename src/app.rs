use crate::config::Config;
use crate::models::{Category, MediaCard, MediaType, ResultPage, TimeWindow, TrendingScope};
use crate::overlay::DetailView;
use crate::pagination::PaginationControls;
use crate::search::is_searchable;
use crate::tmdb::{TmdbApi, TmdbClient, UpstreamError};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub language: String,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(&config)?);
    info!("Using TMDB at {} ({})", config.api_url, config.language);

    let state = AppState {
        tmdb,
        language: config.language.clone(),
    };
    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/categories/:media_type", get(categories))
        .route("/api/trending", get(trending))
        .route("/api/browse/:media_type/:category", get(browse))
        .route("/api/search", get(search))
        .route("/api/details/:media_type/:id", get(details))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

enum ApiError {
    BadRequest(String),
    Upstream(UpstreamError),
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        ApiError::Upstream(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream(e) => {
                warn!("Upstream failure: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

fn parse_media_type(raw: &str) -> Result<MediaType, ApiError> {
    raw.parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))
}

#[derive(Debug, Serialize)]
struct PageResponse {
    page: u32,
    total_pages: u32,
    total_results: u32,
    results: Vec<MediaCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PaginationControls>,
}

impl From<ResultPage> for PageResponse {
    fn from(page: ResultPage) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            results: page.results.iter().map(|item| item.card()).collect(),
            pagination: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryOption {
    value: Category,
    label: &'static str,
}

async fn categories(Path(media_type): Path<String>) -> Result<Json<Vec<CategoryOption>>, ApiError> {
    let media_type = parse_media_type(&media_type)?;
    let options = media_type
        .categories()
        .iter()
        .map(|c| CategoryOption {
            value: *c,
            label: c.label(),
        })
        .collect();
    Ok(Json(options))
}

#[derive(Debug, Deserialize)]
struct TrendingQuery {
    #[serde(default)]
    scope: TrendingScope,
    #[serde(default)]
    window: TimeWindow,
    language: Option<String>,
}

async fn trending(
    State(state): State<AppState>,
    Query(q): Query<TrendingQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let language = q.language.unwrap_or_else(|| state.language.clone());
    let page = state
        .tmdb
        .list_trending(q.scope, q.window, &language)
        .await?;
    Ok(Json(page.into()))
}

#[derive(Debug, Deserialize)]
struct BrowseQuery {
    page: Option<u32>,
    language: Option<String>,
}

async fn browse(
    State(state): State<AppState>,
    Path((media_type, category)): Path<(String, String)>,
    Query(q): Query<BrowseQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let media_type = parse_media_type(&media_type)?;
    let category: Category = category
        .parse()
        .map_err(|e: anyhow::Error| ApiError::BadRequest(e.to_string()))?;
    if !category.supports(media_type) {
        return Err(ApiError::BadRequest(format!(
            "category '{}' is not available for {}",
            category, media_type
        )));
    }
    let page = q.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    let language = q.language.unwrap_or_else(|| state.language.clone());
    let results = state
        .tmdb
        .list_by_category(category, media_type, page, &language)
        .await?;
    let pagination = PaginationControls::new(page, results.total_pages);
    let mut response = PageResponse::from(results);
    response.pagination = Some(pagination);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
    page: Option<u32>,
    language: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    if !is_searchable(&q.query) {
        return Ok(Json(ResultPage::empty().into()));
    }
    let language = q.language.unwrap_or_else(|| state.language.clone());
    let page = q.page.unwrap_or(1).max(1);
    let results = state
        .tmdb
        .search(q.query.trim(), page, &language)
        .await?;
    Ok(Json(results.into()))
}

#[derive(Debug, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

async fn details(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
    Query(q): Query<LanguageQuery>,
) -> Result<Json<DetailView>, ApiError> {
    let media_type = parse_media_type(&media_type)?;
    let language = q.language.unwrap_or_else(|| state.language.clone());
    let item = state.tmdb.fetch_details(id, media_type, &language).await?;
    Ok(Json(DetailView::new(&item, &item)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
