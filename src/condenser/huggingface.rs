// Hugging Face text-to-text inference adapter
// Request:  POST {base}/models/{model_id}
//           { "inputs": "...", "parameters": { max_length, min_length, do_sample } }
// Response: [ { "generated_text": "..." } ]   (text2text-generation)
//           [ { "summary_text": "..." } ]     (summarization pipelines)
//           { "error": "..." }                (model loading, bad input)

use crate::condenser::provider::{BackendLoader, CondenserBackend, GenerationParams};
use crate::config::CondenserConfig;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

const HF_INFERENCE_API_BASE: &str = "https://router.huggingface.co/hf-inference";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
    use_cache: bool,
}

pub struct HuggingFaceBackend {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    model_id: String,
}

impl HuggingFaceBackend {
    pub fn new(model_id: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: HF_INFERENCE_API_BASE.to_string(),
            api_token: None,
            model_id: model_id.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_token(mut self, api_token: Option<String>) -> Self {
        self.api_token = api_token;
        self
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_id)
    }
}

#[async_trait]
impl CondenserBackend for HuggingFaceBackend {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, text: &str, params: &GenerationParams) -> AppResult<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: params,
            options: InferenceOptions {
                wait_for_model: true,
                use_cache: false,
            },
        };

        let mut request = self.client.post(self.model_url()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        debug!(model = %self.model_id, input_len = text.len(), "Sending inference request");

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Model(format!("inference request failed: {}", e)))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| AppError::Model(format!("failed to read inference response: {}", e)))?;

        if !status.is_success() {
            let detail = error_message(&payload).unwrap_or(payload);
            return Err(AppError::Model(format!(
                "inference API error ({}): {}",
                status, detail
            )));
        }

        parse_generated_text(&payload)
    }
}

/// Pull the `error` field out of an inference error body
fn error_message(payload: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(payload)
        .ok()?
        .get("error")?
        .as_str()
        .map(String::from)
}

/// Extract the first generated string from a successful response
fn parse_generated_text(payload: &str) -> AppResult<String> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| AppError::Model(format!("failed to parse inference response: {}", e)))?;

    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return Err(AppError::Model(error.to_string()));
    }

    let first = match &value {
        serde_json::Value::Array(outputs) => outputs.first(),
        serde_json::Value::Object(_) => Some(&value),
        _ => None,
    }
    .ok_or_else(|| AppError::Model("inference response contained no outputs".to_string()))?;

    first
        .get("generated_text")
        .or_else(|| first.get("summary_text"))
        .and_then(|t| t.as_str())
        .map(String::from)
        .ok_or_else(|| AppError::Model("inference output has no generated text".to_string()))
}

/// Builds [`HuggingFaceBackend`]s from the condenser configuration
pub struct HuggingFaceLoader {
    base_url: String,
    api_token: Option<String>,
}

impl HuggingFaceLoader {
    pub fn from_config(config: &CondenserConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl BackendLoader for HuggingFaceLoader {
    async fn load(&self, model_id: &str) -> AppResult<Arc<dyn CondenserBackend>> {
        if model_id.trim().is_empty() {
            return Err(AppError::Model("no model configured".to_string()));
        }
        info!(model = %model_id, base_url = %self.base_url, "Initializing inference backend");
        let backend = HuggingFaceBackend::new(model_id)
            .with_base_url(&self.base_url)
            .with_api_token(self.api_token.clone());
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_parse_generated_text_variants() {
        assert_eq!(
            parse_generated_text(r#"[{"generated_text":"short"}]"#).unwrap(),
            "short"
        );
        assert_eq!(
            parse_generated_text(r#"[{"summary_text":"shorter"}]"#).unwrap(),
            "shorter"
        );
        assert!(parse_generated_text("[]").is_err());
        assert!(parse_generated_text(r#"[{"label":"POSITIVE"}]"#).is_err());
        assert!(parse_generated_text("not json").is_err());

        let err = parse_generated_text(r#"{"error":"Model is overloaded"}"#).unwrap_err();
        assert_eq!(err.cause(), "Model is overloaded");
    }

    #[test]
    fn test_model_url() {
        let backend = HuggingFaceBackend::new("JorgeSarry/est5-summarize")
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            backend.model_url(),
            "http://localhost:8080/models/JorgeSarry/est5-summarize"
        );
    }

    #[tokio::test]
    async fn test_generate_sends_fixed_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/JorgeSarry/est5-summarize")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "Long input text",
                "parameters": { "max_length": 150, "min_length": 50, "do_sample": false }
            })))
            .with_status(200)
            .with_body(json!([{ "generated_text": "Condensed." }]).to_string())
            .create_async()
            .await;

        let backend = HuggingFaceBackend::new("JorgeSarry/est5-summarize")
            .with_base_url(&server.url())
            .with_api_token(Some("hf_test".to_string()));
        let output = backend
            .generate("Long input text", &GenerationParams::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(output, "Condensed.");
    }

    #[tokio::test]
    async fn test_generate_error_status_is_model_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/google/flan-t5-base")
            .with_status(503)
            .with_body(json!({ "error": "Model google/flan-t5-base is currently loading" }).to_string())
            .create_async()
            .await;

        let backend = HuggingFaceBackend::new("google/flan-t5-base").with_base_url(&server.url());
        let err = backend
            .generate("text", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Model(_)));
        assert!(err.cause().contains("currently loading"));
    }

    #[tokio::test]
    async fn test_generate_body_read_error_is_reported() {
        use std::io::Write;

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/google/flan-t5-base")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(br#"[{"generated_text":"#)?;
                Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "dropped"))
            })
            .create_async()
            .await;

        let backend = HuggingFaceBackend::new("google/flan-t5-base").with_base_url(&server.url());
        let err = backend
            .generate("text", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Model(_)));
        assert!(err.cause().starts_with("failed to read inference response"));
    }

    #[test]
    fn test_default_endpoint() {
        let backend = HuggingFaceBackend::new("google/flan-t5-base");
        assert_eq!(
            backend.model_url(),
            "https://router.huggingface.co/hf-inference/models/google/flan-t5-base"
        );
    }

    #[test]
    fn test_loader_rejects_blank_model() {
        let loader = HuggingFaceLoader {
            base_url: HF_INFERENCE_API_BASE.to_string(),
            api_token: None,
        };
        assert!(tokio_test::block_on(loader.load(" ")).is_err());
        let backend = tokio_test::assert_ok!(tokio_test::block_on(loader.load("google/flan-t5-base")));
        assert_eq!(backend.model_id(), "google/flan-t5-base");
    }
}
