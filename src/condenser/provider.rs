use crate::types::AppResult;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Fixed decoding parameters passed through to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 50,
            do_sample: false,
        }
    }
}

impl From<&crate::config::CondenserConfig> for GenerationParams {
    fn from(config: &crate::config::CondenserConfig) -> Self {
        Self {
            max_length: config.max_length,
            min_length: config.min_length,
            do_sample: false,
        }
    }
}

/// A loaded text-to-text model.
#[async_trait]
pub trait CondenserBackend: Send + Sync {
    fn model_id(&self) -> &str;

    /// Return the single best (non-sampled) output for `text`.
    async fn generate(&self, text: &str, params: &GenerationParams) -> AppResult<String>;
}

/// Acquires a backend for a model identifier. Called at most once per mode.
#[async_trait]
pub trait BackendLoader: Send + Sync {
    async fn load(&self, model_id: &str) -> AppResult<Arc<dyn CondenserBackend>>;
}
