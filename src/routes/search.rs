use axum::{extract::State, routing::post, Json, Router};
use tracing::info;
use validator::Validate;

use crate::models::{AppState, SearchRequest, SearchResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search_handler))
        .with_state(state)
}

async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    request.validate()?;

    let limit = state.config.search.check_limit(request.limit)?;

    info!(query = %request.query, limit, "Search request received");

    let rows = state.service.search(&request.query, limit).await?;
    Ok(Json(SearchResponse { count: rows.len(), rows }))
}
