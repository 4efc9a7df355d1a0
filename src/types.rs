// Error types shared by every pipeline stage

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The metadata API could not be reached, answered non-2xx, or sent an unparseable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The inference backend could not produce output.
    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Human-readable cause without the variant prefix.
    pub fn cause(&self) -> &str {
        match self {
            AppError::Transport(cause)
            | AppError::Model(cause)
            | AppError::InvalidRequest(cause)
            | AppError::Config(cause) => cause,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Transport(_) | AppError::Model(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.cause() }));
        (self.status_code(), body).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
