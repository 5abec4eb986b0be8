//! Caching module for Rarefactor
//!
//! Remembers successful API answers for recently seen queries. Failures are
//! never cached, so an explicit resubmission always reaches the API again.

use crate::api::SearchBackend;
use crate::config::CacheSettings;
use crate::error::FetchError;
use crate::results::SearchPage;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Decorator adding a TTL cache in front of another backend
pub struct CachingBackend {
    inner: Arc<dyn SearchBackend>,
    suggestions: Cache<String, Vec<String>>,
    pages: Cache<String, SearchPage>,
}

impl CachingBackend {
    /// Create a new cache with specified TTL and capacity per endpoint
    pub fn new(inner: Arc<dyn SearchBackend>, ttl_seconds: u64, max_capacity: u64) -> Self {
        let ttl = Duration::from_secs(ttl_seconds);
        Self {
            inner,
            suggestions: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            pages: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
        }
    }

    pub fn with_settings(inner: Arc<dyn SearchBackend>, settings: &CacheSettings) -> Self {
        Self::new(inner, settings.ttl_seconds, settings.max_capacity)
    }

    /// Clear both caches
    pub fn clear(&self) {
        self.suggestions.invalidate_all();
        self.pages.invalidate_all();
    }
}

/// Wrap `backend` in a cache when enabled
pub fn layer(backend: Arc<dyn SearchBackend>, settings: &CacheSettings) -> Arc<dyn SearchBackend> {
    if settings.enabled {
        Arc::new(CachingBackend::with_settings(backend, settings))
    } else {
        backend
    }
}

#[async_trait]
impl SearchBackend for CachingBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<String>, FetchError> {
        if let Some(terms) = self.suggestions.get(query).await {
            trace!(query, "suggestion cache hit");
            return Ok(terms);
        }
        let terms = self.inner.autocomplete(query).await?;
        self.suggestions
            .insert(query.to_string(), terms.clone())
            .await;
        Ok(terms)
    }

    async fn search(&self, query: &str) -> Result<SearchPage, FetchError> {
        if let Some(page) = self.pages.get(query).await {
            trace!(query, "search cache hit");
            return Ok(page);
        }
        let page = self.inner.search(query).await?;
        self.pages.insert(query.to_string(), page.clone()).await;
        Ok(page)
    }
}
