//! Scripted backend for controller tests

use super::SearchBackend;
use crate::error::FetchError;
use crate::results::SearchPage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::oneshot;

type Responder<T> = oneshot::Sender<Result<T, FetchError>>;

/// Answers canned queries immediately and holds every other call open until
/// the test releases it, so tests control resolution order.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    canned_suggestions: Mutex<HashMap<String, Result<Vec<String>, FetchError>>>,
    canned_pages: Mutex<HashMap<String, Result<SearchPage, FetchError>>>,
    held_suggestions: Mutex<HashMap<String, Responder<Vec<String>>>>,
    held_pages: Mutex<HashMap<String, Responder<SearchPage>>>,
    autocomplete_calls: Mutex<Vec<String>>,
    search_calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggest(self, query: &str, terms: &[&str]) -> Self {
        let terms = terms.iter().map(|t| t.to_string()).collect();
        self.canned_suggestions
            .lock()
            .insert(query.to_string(), Ok(terms));
        self
    }

    pub fn suggest_err(self, query: &str, err: FetchError) -> Self {
        self.canned_suggestions
            .lock()
            .insert(query.to_string(), Err(err));
        self
    }

    pub fn page(self, query: &str, page: Result<SearchPage, FetchError>) -> Self {
        self.canned_pages.lock().insert(query.to_string(), page);
        self
    }

    pub fn autocomplete_calls(&self) -> Vec<String> {
        self.autocomplete_calls.lock().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().clone()
    }

    pub fn is_holding_search(&self, query: &str) -> bool {
        self.held_pages.lock().contains_key(query)
    }

    /// Release a held search call. Returns false if none was held or the
    /// caller is gone.
    pub fn release_search(&self, query: &str, page: Result<SearchPage, FetchError>) -> bool {
        match self.held_pages.lock().remove(query) {
            Some(tx) => tx.send(page).is_ok(),
            None => false,
        }
    }

    pub fn release_suggestions(&self, query: &str, terms: Result<Vec<String>, FetchError>) -> bool {
        match self.held_suggestions.lock().remove(query) {
            Some(tx) => tx.send(terms).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<String>, FetchError> {
        self.autocomplete_calls.lock().push(query.to_string());
        let canned = self.canned_suggestions.lock().get(query).cloned();
        if let Some(canned) = canned {
            return canned;
        }
        let (tx, rx) = oneshot::channel();
        self.held_suggestions.lock().insert(query.to_string(), tx);
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("responder dropped".into())))
    }

    async fn search(&self, query: &str) -> Result<SearchPage, FetchError> {
        self.search_calls.lock().push(query.to_string());
        let canned = self.canned_pages.lock().get(query).cloned();
        if let Some(canned) = canned {
            return canned;
        }
        let (tx, rx) = oneshot::channel();
        self.held_pages.lock().insert(query.to_string(), tx);
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Network("responder dropped".into())))
    }
}

/// Let spawned tasks run until they block
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
