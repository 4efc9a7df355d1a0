//! API Routes
//!
//! HTTP endpoints over the caller-facing API:
//! - `/api/search` - keyword search, returns normalized rows
//! - `/api/condense` - summarize or generate from free text
//! - `/api/health` - health check

pub mod condense;
pub mod health;
pub mod search;

use axum::Router;
use crate::models::AppState;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(search::router(state.clone()))
        .merge(condense::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
