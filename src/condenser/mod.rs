//! Text Condenser
//!
//! Runs free text through a pretrained text-to-text model. Two modes map to
//! two fixed model identities:
//! - `Summarize` - a summarization-tuned model
//! - `Generate` - a general text-to-text model
//!
//! Each mode's backend is acquired lazily on first use and kept for the life
//! of the condenser; concurrent first calls share one acquisition.

pub mod huggingface;
pub mod provider;

pub use huggingface::{HuggingFaceBackend, HuggingFaceLoader};
pub use provider::{BackendLoader, CondenserBackend, GenerationParams};

use crate::config::CondenserConfig;
use crate::models::{CondensationRequest, CondensationResult, CondenseMode};
use crate::types::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

pub struct TextCondenser {
    loader: Arc<dyn BackendLoader>,
    summarize_model: String,
    generate_model: String,
    params: GenerationParams,
    summarize: OnceCell<Arc<dyn CondenserBackend>>,
    generate: OnceCell<Arc<dyn CondenserBackend>>,
}

impl TextCondenser {
    pub fn new(
        loader: Arc<dyn BackendLoader>,
        summarize_model: impl Into<String>,
        generate_model: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            summarize_model: summarize_model.into(),
            generate_model: generate_model.into(),
            params: GenerationParams::default(),
            summarize: OnceCell::new(),
            generate: OnceCell::new(),
        }
    }

    /// Condenser backed by the hosted inference API
    pub fn from_config(config: &CondenserConfig) -> Self {
        Self::new(
            Arc::new(HuggingFaceLoader::from_config(config)),
            config.summarize_model.clone(),
            config.generate_model.clone(),
        )
        .with_params(GenerationParams::from(config))
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn model_for(&self, mode: CondenseMode) -> &str {
        match mode {
            CondenseMode::Summarize => &self.summarize_model,
            CondenseMode::Generate => &self.generate_model,
        }
    }

    async fn backend(&self, mode: CondenseMode) -> AppResult<&Arc<dyn CondenserBackend>> {
        let cell = match mode {
            CondenseMode::Summarize => &self.summarize,
            CondenseMode::Generate => &self.generate,
        };
        let model_id = self.model_for(mode);

        cell.get_or_try_init(|| async {
            info!(%mode, model = %model_id, "Acquiring model backend");
            self.loader.load(model_id).await.map_err(into_model_failure)
        })
        .await
    }

    /// Condense `text` with the model selected by `mode`.
    ///
    /// Callers reject empty text before getting here.
    pub async fn condense(&self, text: &str, mode: CondenseMode) -> AppResult<String> {
        let backend = self.backend(mode).await?;

        info!(%mode, model = %backend.model_id(), input_len = text.len(), "Condensing text");

        let output = backend
            .generate(text, &self.params)
            .await
            .map_err(into_model_failure)?;

        let output = output.trim();
        if output.is_empty() {
            warn!(%mode, "Model returned empty output");
            return Err(AppError::Model("model returned empty output".to_string()));
        }

        Ok(output.to_string())
    }

    pub async fn condense_request(&self, request: &CondensationRequest) -> AppResult<CondensationResult> {
        let text = self.condense(&request.text, request.mode).await?;
        Ok(CondensationResult { text })
    }
}

/// Any backend fault surfaces as a model failure, whatever its origin.
fn into_model_failure(err: AppError) -> AppError {
    match err {
        AppError::Model(_) => err,
        other => AppError::Model(other.cause().to_string()),
    }
}
