//! Caller-facing API
//!
//! The only entry points presentation code needs: `search` runs the
//! query → client → normalizer pipeline, `condense` runs text through the
//! condenser. Both return a row set or string on success and an [`AppError`]
//! otherwise. An empty `Vec` from `search` means the API answered with no
//! hits, which is not a failure.

use crate::condenser::TextCondenser;
use crate::config::Config;
use crate::models::{CondensationRequest, CondenseMode, NormalizedRow, SearchQuery};
use crate::search::{normalize, CrossRefClient};
use crate::types::AppResult;
use tracing::info;

pub struct PaperService {
    client: CrossRefClient,
    condenser: TextCondenser,
}

impl PaperService {
    pub fn new(client: CrossRefClient, condenser: TextCondenser) -> Self {
        Self { client, condenser }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CrossRefClient::from_config(&config.search),
            TextCondenser::from_config(&config.condenser),
        )
    }

    pub async fn search(&self, keywords: &str, limit: u32) -> AppResult<Vec<NormalizedRow>> {
        let query = SearchQuery::new(keywords, limit)?;
        self.run_query(&query).await
    }

    pub async fn run_query(&self, query: &SearchQuery) -> AppResult<Vec<NormalizedRow>> {
        let items = self.client.search(query.keywords(), query.limit()).await?;
        let rows = normalize(&items);
        info!(query = %query.keywords(), rows = rows.len(), "Search pipeline completed");
        Ok(rows)
    }

    pub async fn condense(&self, text: &str, mode: CondenseMode) -> AppResult<String> {
        let request = CondensationRequest::new(text, mode)?;
        Ok(self.condenser.condense_request(&request).await?.text)
    }
}
