use std::time::Instant;

use axum::extract::{Query, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use imdb_core::TitleRecord;
use imdb_engine::ImdbClient;
use scrape_logging::{scrape_debug, scrape_info};
use serde_json::Value;

use crate::config::ServiceInfo;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub client: ImdbClient,
    pub info: ServiceInfo,
}

impl AppState {
    pub fn new(client: ImdbClient, info: ServiceInfo) -> Self {
        Self { client, info }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/search", get(search))
        .route("/api/movie", get(movie))
        .route("/api/search/getFullInfo", get(search_full_info))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Raw query pairs in request order; a repeated name is not a rejection.
type QueryPairs = Query<Vec<(String, String)>>;

/// First value of `name`. An absent or empty parameter counts as missing.
fn required(pairs: Vec<(String, String)>, name: &str, message: &str) -> AppResult<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request(message))
}

async fn index(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info)
}

async fn search(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> AppResult<Json<Vec<Value>>> {
    let query = required(pairs, "query", "Query is required")?;
    scrape_info!("search {:?}", query);
    Ok(Json(state.client.search(&query).await?))
}

async fn movie(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> AppResult<Json<TitleRecord>> {
    let id = required(pairs, "id", "IMDb ID is required")?;
    scrape_info!("title {}", id);
    Ok(Json(state.client.title(&id).await?))
}

async fn search_full_info(
    State(state): State<AppState>,
    Query(pairs): QueryPairs,
) -> AppResult<Json<Vec<TitleRecord>>> {
    let query = required(pairs, "query", "Query is required")?;
    scrape_info!("full info {:?}", query);
    Ok(Json(state.client.search_full_info(&query).await?))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();
    let response = next.run(request).await;
    scrape_debug!(
        "{} {} -> {} in {:?}",
        method,
        uri,
        response.status(),
        started.elapsed()
    );
    response
}
