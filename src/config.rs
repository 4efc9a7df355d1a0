use crate::types::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub condenser: CondenserConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the works API, without the `/works` path
    pub base_url: String,
    /// Contact address for the Crossref polite pool
    pub mailto: Option<String>,
    pub default_rows: u32,
    pub min_rows: u32,
    pub max_rows: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CondenserConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub summarize_model: String,
    pub generate_model: String,
    pub max_length: u32,
    pub min_length: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
            },
            search: SearchConfig {
                base_url: "https://api.crossref.org".to_string(),
                mailto: None,
                default_rows: 10,
                min_rows: 5,
                max_rows: 50,
            },
            condenser: CondenserConfig {
                base_url: "https://router.huggingface.co/hf-inference".to_string(),
                api_token: None,
                summarize_model: "JorgeSarry/est5-summarize".to_string(),
                generate_model: "google/flan-t5-base".to_string(),
                max_length: 150,
                min_length: 50,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            server: ServerConfig {
                port: parse_var("PORT", defaults.server.port)?,
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            search: SearchConfig {
                base_url: env::var("CROSSREF_API_URL").unwrap_or(defaults.search.base_url),
                mailto: env::var("CROSSREF_MAILTO").ok().filter(|s| !s.is_empty()),
                default_rows: parse_var("SEARCH_DEFAULT_ROWS", defaults.search.default_rows)?,
                min_rows: parse_var("SEARCH_MIN_ROWS", defaults.search.min_rows)?,
                max_rows: parse_var("SEARCH_MAX_ROWS", defaults.search.max_rows)?,
            },
            condenser: CondenserConfig {
                base_url: env::var("INFERENCE_API_URL").unwrap_or(defaults.condenser.base_url),
                api_token: env::var("HF_API_TOKEN").ok().filter(|s| !s.is_empty()),
                summarize_model: env::var("SUMMARIZE_MODEL")
                    .unwrap_or(defaults.condenser.summarize_model),
                generate_model: env::var("GENERATE_MODEL")
                    .unwrap_or(defaults.condenser.generate_model),
                max_length: parse_var("CONDENSE_MAX_LENGTH", defaults.condenser.max_length)?,
                min_length: parse_var("CONDENSE_MIN_LENGTH", defaults.condenser.min_length)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        let search = &self.search;
        if search.min_rows == 0 || search.min_rows > search.max_rows {
            return Err(AppError::Config(format!(
                "row range {}..={} is empty",
                search.min_rows, search.max_rows
            )));
        }
        if !(search.min_rows..=search.max_rows).contains(&search.default_rows) {
            return Err(AppError::Config(format!(
                "SEARCH_DEFAULT_ROWS={} lies outside {}..={}",
                search.default_rows, search.min_rows, search.max_rows
            )));
        }
        if self.condenser.min_length > self.condenser.max_length {
            return Err(AppError::Config(
                "CONDENSE_MIN_LENGTH exceeds CONDENSE_MAX_LENGTH".to_string(),
            ));
        }
        Ok(())
    }
}

impl SearchConfig {
    /// Resolve a requested result count, rejecting values outside the row range.
    pub fn check_limit(&self, limit: Option<u32>) -> AppResult<u32> {
        let limit = limit.unwrap_or(self.default_rows);
        if !(self.min_rows..=self.max_rows).contains(&limit) {
            return Err(AppError::InvalidRequest(format!(
                "Number of papers must be between {} and {}",
                self.min_rows, self.max_rows
            )));
        }
        Ok(limit)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={raw:?}: {e}"))),
        Err(_) => Ok(default),
    }
}
