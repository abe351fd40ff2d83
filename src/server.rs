use axum::{
    extract::{
        self,
        rejection::{JsonRejection, QueryRejection},
        State,
    },
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn, Instrument};

use crate::core::error::SearchError;
use crate::types::*;
use crate::AppState;

pub const RATE_LIMITED_MESSAGE: &str =
    "Google is rate-limiting. Try again later or use a SERP API.";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to scrape Google results";
pub const INVALID_INPUT_MESSAGE: &str = "Keyword not found";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/scraper", get(scraper_handler))
        .route("/search", post(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "serp-scout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/scraper?keyword=...`
async fn scraper_handler(
    State(state): State<Arc<AppState>>,
    params: Result<extract::Query<KeywordParams>, QueryRejection>,
) -> ApiResult<SearchResponse> {
    let extract::Query(params) = params.map_err(|e| reject_malformed(&e.body_text()))?;
    run_search(&state, params.keyword.as_deref().unwrap_or_default()).await
}

/// `POST /search` with `{"keyword": "..."}`
async fn search_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResponse> {
    let Json(request) = request.map_err(|e| reject_malformed(&e.body_text()))?;
    run_search(&state, &request.keyword).await
}

/// Unreadable query strings and bodies answer like a missing keyword.
fn reject_malformed(detail: &str) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Rejected search request: {}", detail);
    error_response(&SearchError::InvalidInput)
}

async fn run_search(state: &AppState, keyword: &str) -> ApiResult<SearchResponse> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("search", %request_id);

    async {
        match state.search_service.search(keyword).await {
            Ok(response) => Ok(Json(response)),
            Err(e) => {
                match &e {
                    SearchError::InvalidInput => warn!("Rejected search: {}", e),
                    _ => error!("Scraping error [{}]: {}", e.code(), e),
                }
                Err(error_response(&e))
            }
        }
    }
    .instrument(span)
    .await
}

/// Rate limiting passes the upstream status through; everything else upstream is a 500.
pub fn error_response(e: &SearchError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match e {
        SearchError::InvalidInput => (StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE),
        SearchError::UpstreamRateLimited { status, .. } => (*status, RATE_LIMITED_MESSAGE),
        SearchError::UpstreamUnavailable(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
        }
    };
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}
