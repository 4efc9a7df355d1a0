// Paper Finder - scholarly metadata search and text condensation

pub mod config;
pub mod models;
pub mod types;
pub mod search;    // Crossref works client and record normalizer
pub mod condenser; // Text-to-text model backends
pub mod service;   // Caller-facing search/condense API
pub mod display;
pub mod routes;
pub mod utils;
pub mod tui;       // Terminal User Interface

// Re-exports for convenience
pub use config::Config;
pub use models::{AppState, CondenseMode, NormalizedRow, Published};
pub use service::PaperService;
pub use types::{AppError, AppResult};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
