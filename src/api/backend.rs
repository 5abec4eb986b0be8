//! Search API backends

use super::envelope::{extract_page, extract_suggestions};
use crate::config::{ApiSettings, SuggestSettings};
use crate::error::FetchError;
use crate::network::HttpClient;
use crate::results::SearchPage;
use async_trait::async_trait;

/// Source of suggestions and ranked results
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch autocomplete terms for a query prefix
    async fn autocomplete(&self, query: &str) -> Result<Vec<String>, FetchError>;

    /// Fetch ranked results for a query
    async fn search(&self, query: &str) -> Result<SearchPage, FetchError>;
}

/// The Rarefactor HTTP API
pub struct HttpBackend {
    client: HttpClient,
    search_path: String,
    autocomplete_path: String,
    limit: u32,
}

impl HttpBackend {
    pub fn new(client: HttpClient, api: &ApiSettings, suggest: &SuggestSettings) -> Self {
        Self {
            client,
            search_path: api.search_path.clone(),
            autocomplete_path: api.autocomplete_path.clone(),
            limit: suggest.limit,
        }
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<String>, FetchError> {
        let params = [("q", query.to_string()), ("limit", self.limit.to_string())];
        let response = self
            .client
            .get_with_params(&self.autocomplete_path, &params)
            .await?;

        // {"suggestions": [...]}
        Ok(extract_suggestions(&response.json()?))
    }

    async fn search(&self, query: &str) -> Result<SearchPage, FetchError> {
        let params = [("q", query.to_string())];
        let response = self
            .client
            .get_with_params(&self.search_path, &params)
            .await?;

        Ok(extract_page(&response.json()?))
    }
}
