use crate::config::Config;
use crate::service::PaperService;
use crate::types::{AppError, AppResult};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tabled::Tabled;
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<PaperService>,
}

// Search pipeline

/// A single keyword search, consumed once by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keywords: String,
    limit: u32,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>, limit: u32) -> AppResult<Self> {
        let keywords = keywords.into().trim().to_string();
        if keywords.is_empty() {
            return Err(AppError::InvalidRequest(
                "Please enter a search query.".to_string(),
            ));
        }
        if limit == 0 {
            return Err(AppError::InvalidRequest(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { keywords, limit })
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// Upstream work item exactly as the metadata API sent it.
///
/// Kept as raw JSON so that no item shape can fail deserialization;
/// every field is looked up on demand by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawWorkRecord(pub serde_json::Value);

impl RawWorkRecord {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }
}

impl From<serde_json::Value> for RawWorkRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Publication year, or a marker that the upstream record had none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    Year(i64),
    Unknown,
}

impl Published {
    pub fn year(&self) -> Option<i64> {
        match self {
            Published::Year(year) => Some(*year),
            Published::Unknown => None,
        }
    }
}

impl fmt::Display for Published {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Published::Year(year) => write!(f, "{}", year),
            Published::Unknown => write!(f, "N/A"),
        }
    }
}

impl Serialize for Published {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Published::Year(year) => serializer.serialize_i64(*year),
            Published::Unknown => serializer.serialize_none(),
        }
    }
}

/// Fixed-shape table row produced for every upstream record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct NormalizedRow {
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    #[tabled(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Journal")]
    #[tabled(rename = "Journal")]
    pub journal: String,
    #[serde(rename = "DOI")]
    #[tabled(rename = "DOI")]
    pub doi: String,
    #[serde(rename = "Link")]
    #[tabled(rename = "Link")]
    pub link: String,
    #[serde(rename = "Published")]
    #[tabled(rename = "Published")]
    pub published: Published,
}

impl NormalizedRow {
    pub const COLUMNS: [&'static str; 6] = ["Title", "Authors", "Journal", "DOI", "Link", "Published"];

    /// Cell values in column order, with the unknown year rendered as `N/A`.
    pub fn cells(&self) -> [String; 6] {
        [
            self.title.clone(),
            self.authors.clone(),
            self.journal.clone(),
            self.doi.clone(),
            self.link.clone(),
            self.published.to_string(),
        ]
    }
}

// Condensation pipeline

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CondenseMode {
    Summarize,
    Generate,
}

impl fmt::Display for CondenseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CondenseMode::Summarize => write!(f, "summarize"),
            CondenseMode::Generate => write!(f, "generate"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CondensationRequest {
    pub text: String,
    pub mode: CondenseMode,
}

impl CondensationRequest {
    pub fn new(text: impl Into<String>, mode: CondenseMode) -> AppResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Please enter text to summarize.".to_string(),
            ));
        }
        Ok(Self { text, mode })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CondensationResult {
    pub text: String,
}

// API Request/Response types

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub rows: Vec<NormalizedRow>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CondenseRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
    #[serde(default = "default_mode")]
    pub mode: CondenseMode,
}

fn default_mode() -> CondenseMode {
    CondenseMode::Summarize
}

#[derive(Debug, Serialize)]
pub struct CondenseResponse {
    pub mode: CondenseMode,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_rejects_blank_keywords() {
        assert!(matches!(
            SearchQuery::new("   ", 10),
            Err(AppError::InvalidRequest(_))
        ));
        assert!(SearchQuery::new("crispr", 0).is_err());

        let query = SearchQuery::new("  machine learning optimization ", 10).unwrap();
        assert_eq!(query.keywords(), "machine learning optimization");
        assert_eq!(query.limit(), 10);
    }

    #[test]
    fn test_condensation_request_rejects_empty_text() {
        let err = CondensationRequest::new("", CondenseMode::Summarize).unwrap_err();
        assert_eq!(err.cause(), "Please enter text to summarize.");
    }

    #[test]
    fn test_published_rendering() {
        assert_eq!(Published::Year(2021).to_string(), "2021");
        assert_eq!(Published::Unknown.to_string(), "N/A");
        assert_eq!(serde_json::to_value(Published::Unknown).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Published::Year(1999)).unwrap(), serde_json::json!(1999));
    }

    #[test]
    fn test_row_serializes_with_column_names() {
        let row = NormalizedRow {
            title: "Deep Learning".to_string(),
            authors: "LeCun, Bengio, Hinton".to_string(),
            journal: "Nature".to_string(),
            doi: "10.1038/nature14539".to_string(),
            link: "https://doi.org/10.1038/nature14539".to_string(),
            published: Published::Year(2015),
        };
        let value = serde_json::to_value(&row).unwrap();
        for column in NormalizedRow::COLUMNS {
            assert!(value.get(column).is_some(), "missing column {}", column);
        }
        assert_eq!(row.cells()[5], "2015");
    }

    #[test]
    fn test_condense_request_defaults_to_summarize() {
        let request: CondenseRequest = serde_json::from_str(r#"{"text":"abc"}"#).unwrap();
        assert_eq!(request.mode, CondenseMode::Summarize);

        let request: CondenseRequest =
            serde_json::from_str(r#"{"text":"abc","mode":"generate"}"#).unwrap();
        assert_eq!(request.mode, CondenseMode::Generate);
    }

    #[test]
    fn test_search_request_validation() {
        let request = SearchRequest { query: String::new(), limit: None };
        assert!(request.validate().is_err());
    }
}
