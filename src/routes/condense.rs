use axum::{extract::State, routing::post, Json, Router};
use tracing::info;
use validator::Validate;

use crate::models::{AppState, CondenseRequest, CondenseResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/condense", post(condense_handler))
        .with_state(state)
}

async fn condense_handler(
    State(state): State<AppState>,
    Json(request): Json<CondenseRequest>,
) -> AppResult<Json<CondenseResponse>> {
    request.validate()?;

    info!(mode = %request.mode, input_len = request.text.len(), "Condense request received");

    let text = state.service.condense(&request.text, request.mode).await?;
    Ok(Json(CondenseResponse { mode: request.mode, text }))
}
