//! Crossref Works Client
//!
//! Issues a single keyword search against the Crossref `/works` endpoint,
//! restricted to journal articles, and hands back the raw `message.items`.
//!
//! ## Outcomes
//!
//! - **2xx with items**: the items, in upstream order
//! - **2xx with no items**: an empty page, which is a success
//! - **non-2xx, bad JSON, unreachable host**: a [`SearchError`]
//!
//! The row count is forwarded as given. Range limits belong to the caller.

use crate::config::SearchConfig;
use crate::models::RawWorkRecord;
use crate::types::AppError;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

const CROSSREF_API_BASE: &str = "https://api.crossref.org";
const JOURNAL_ARTICLE_FILTER: &str = "type:journal-article";

/// Errors that can occur while talking to the works API
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP error occurred: {status}")]
    HttpStatus { status: reqwest::StatusCode },

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        AppError::Transport(err.to_string())
    }
}

/// Crossref client for journal-article metadata
#[derive(Debug, Clone)]
pub struct CrossRefClient {
    client: Client,
    base_url: String,
    mailto: Option<String>,
}

impl Default for CrossRefClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossRefClient {
    /// Create a client pointed at the public Crossref API
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: CROSSREF_API_BASE.to_string(),
            mailto: None,
        }
    }

    /// Configure client from config
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new()
            .with_base_url(&config.base_url)
            .with_mailto(config.mailto.clone())
    }

    /// Point the client at another host (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Identify ourselves for the Crossref polite pool
    pub fn with_mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto;
        self
    }

    fn works_url(&self) -> String {
        format!("{}/works", self.base_url)
    }

    /// Search journal articles by keyword
    pub async fn search(&self, keywords: &str, limit: u32) -> Result<Vec<RawWorkRecord>, SearchError> {
        info!(query = %keywords, rows = limit, "Searching Crossref works");

        let mut params = vec![
            ("query", keywords.to_string()),
            ("rows", limit.to_string()),
            ("filter", JOURNAL_ARTICLE_FILTER.to_string()),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto", mailto.clone()));
        }

        let response = self
            .client
            .get(self.works_url())
            .header(
                "User-Agent",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            )
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Crossref returned an error status");
            return Err(SearchError::HttpStatus { status });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!("Raw Crossref response received");

        let items = parse_items(body)?;
        info!(count = items.len(), "Crossref search completed");
        Ok(items)
    }
}

/// Pull `message.items` out of a works response body.
///
/// Only an object `message` without `items` (or with `items: null`) is an
/// empty page; any other body shape is a parse failure.
fn parse_items(body: serde_json::Value) -> Result<Vec<RawWorkRecord>, SearchError> {
    let message = match body {
        serde_json::Value::Object(mut body) => body.remove("message"),
        other => {
            return Err(SearchError::ParseError(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut message = match message {
        Some(serde_json::Value::Object(message)) => message,
        Some(other) => {
            return Err(SearchError::ParseError(format!(
                "expected message to be an object, got {}",
                json_kind(&other)
            )))
        }
        None => return Err(SearchError::ParseError("response has no message".to_string())),
    };

    match message.remove("items") {
        Some(serde_json::Value::Array(items)) => Ok(items.into_iter().map(RawWorkRecord::from).collect()),
        Some(serde_json::Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(SearchError::ParseError(format!(
            "expected message.items to be an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> CrossRefClient {
        CrossRefClient::new().with_base_url(&server.url())
    }

    #[test]
    fn test_parse_items() {
        let body = json!({ "message": { "items": [{ "DOI": "10.1/a" }, { "DOI": "10.1/b" }] } });
        let items = parse_items(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("DOI"), Some(&json!("10.1/b")));

        assert!(parse_items(json!({ "message": {} })).unwrap().is_empty());
        assert!(parse_items(json!({ "message": { "items": null } })).unwrap().is_empty());
        assert!(parse_items(json!({ "message": { "items": "nope" } })).is_err());
    }

    #[test]
    fn test_parse_items_rejects_unexpected_bodies() {
        for body in [
            json!([1, 2, 3]),
            json!("oops"),
            json!({ "status": "ok" }),
            json!({ "message": "Service temporarily unavailable" }),
            json!({ "message": null }),
        ] {
            assert!(
                matches!(parse_items(body.clone()), Err(SearchError::ParseError(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = CrossRefClient::new().with_base_url("http://localhost:1234/");
        assert_eq!(client.works_url(), "http://localhost:1234/works");
    }

    #[tokio::test]
    async fn test_search_sends_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "machine learning optimization".into()),
                Matcher::UrlEncoded("rows".into(), "10".into()),
                Matcher::UrlEncoded("filter".into(), "type:journal-article".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "message": { "items": [{ "title": ["A"] }] } }).to_string())
            .create_async()
            .await;

        let items = client_for(&server)
            .search("machine learning optimization", 10)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_search_forwards_limit_unclamped() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::UrlEncoded("rows".into(), "500".into()))
            .with_status(200)
            .with_body(json!({ "message": { "items": [] } }).to_string())
            .create_async()
            .await;

        let items = client_for(&server).search("graphene", 500).await.unwrap();
        mock.assert_async().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_search_includes_mailto_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::UrlEncoded("mailto".into(), "lab@example.org".into()))
            .with_status(200)
            .with_body(json!({ "message": { "items": [] } }).to_string())
            .create_async()
            .await;

        client_for(&server)
            .with_mailto(Some("lab@example.org".to_string()))
            .search("proteomics", 5)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_non_2xx_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream overloaded")
            .create_async()
            .await;

        let err = client_for(&server).search("anything", 10).await.unwrap_err();
        assert!(matches!(err, SearchError::HttpStatus { status } if status.as_u16() == 503));
        assert!(matches!(AppError::from(err), AppError::Transport(_)));
    }

    #[tokio::test]
    async fn test_search_malformed_json_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).search("anything", 10).await.unwrap_err();
        assert!(matches!(err, SearchError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_search_wrong_shaped_success_is_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "message": "Service temporarily unavailable" }).to_string())
            .create_async()
            .await;

        let err = client_for(&server).search("anything", 10).await.unwrap_err();
        assert!(matches!(err, SearchError::ParseError(_)));
        assert!(matches!(AppError::from(err), AppError::Transport(_)));
    }

    #[tokio::test]
    async fn test_search_unreachable_host_is_failure() {
        // Port 9 (discard) is not expected to be serving HTTP locally
        let client = CrossRefClient::new().with_base_url("http://127.0.0.1:9");
        let err = client.search("anything", 10).await.unwrap_err();
        assert!(matches!(err, SearchError::RequestFailed(_)));
    }
}
