//! Suggestion controller

use crate::api::SearchBackend;
use crate::config::SuggestSettings;
use crate::debounce::Debouncer;
use crate::metrics::{ControllerMetrics, MetricsSnapshot};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The suggestion list together with the debounced query that produced it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    pub terms: Vec<String>,
    pub source_query: String,
}

/// Turns query text into autocomplete requests.
///
/// Only the response for the latest debounced query may update the list.
/// Dropping the controller makes every pending timer and request inert.
pub struct SuggestionController {
    debouncer: Debouncer<String>,
    inner: Arc<Inner>,
    driver: JoinHandle<()>,
}

struct Inner {
    backend: Arc<dyn SearchBackend>,
    min_chars: usize,
    state: watch::Sender<SuggestionState>,
    flight: Mutex<Flight>,
    cancel: CancellationToken,
    metrics: ControllerMetrics,
}

#[derive(Default)]
struct Flight {
    generation: u64,
    expected: Option<String>,
    token: Option<CancellationToken>,
}

impl SuggestionController {
    /// Create a controller. Must be called from within a Tokio runtime.
    pub fn new(backend: Arc<dyn SearchBackend>, settings: &SuggestSettings) -> Self {
        let debouncer = Debouncer::new(String::new(), settings.debounce());
        let (state, _rx) = watch::channel(SuggestionState::default());
        let inner = Arc::new(Inner {
            backend,
            min_chars: settings.min_query_chars,
            state,
            flight: Mutex::new(Flight::default()),
            cancel: CancellationToken::new(),
            metrics: ControllerMetrics::new(),
        });

        let driver = tokio::spawn(drive(Arc::clone(&inner), debouncer.subscribe()));

        Self {
            debouncer,
            inner,
            driver,
        }
    }

    /// Feed the latest query text
    pub fn on_query_change(&self, text: &str) {
        self.debouncer.observe(text.to_string());
    }

    /// The latest valid suggestion list
    pub fn suggestions(&self) -> Vec<String> {
        self.inner.state.borrow().terms.clone()
    }

    pub fn state(&self) -> SuggestionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified whenever the suggestion list is replaced
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.inner.state.subscribe()
    }

    /// The query the controller currently wants suggestions for
    pub fn debounced_query(&self) -> String {
        self.debouncer.current()
    }

    pub fn min_chars(&self) -> usize {
        self.inner.min_chars
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Stop the timer and make all in-flight requests inert
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.debouncer.shutdown();
        self.driver.abort();
    }
}

impl Drop for SuggestionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn drive(inner: Arc<Inner>, mut debounced: watch::Receiver<String>) {
    loop {
        tokio::select! {
            _ = inner.cancel.cancelled() => break,
            changed = debounced.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = debounced.borrow_and_update().clone();
                inner.on_debounced(text);
            }
        }
    }
}

impl Inner {
    fn on_debounced(self: &Arc<Self>, text: String) {
        if self.cancel.is_cancelled() {
            return;
        }

        let mut flight = self.flight.lock();
        flight.generation += 1;
        if let Some(token) = flight.token.take() {
            token.cancel();
        }

        if text.chars().count() < self.min_chars {
            flight.expected = None;
            debug!(query = %text, "query too short, clearing suggestions");
            self.state.send_replace(SuggestionState {
                terms: Vec::new(),
                source_query: text,
            });
            return;
        }

        let generation = flight.generation;
        let token = self.cancel.child_token();
        flight.expected = Some(text.clone());
        flight.token = Some(token.clone());
        drop(flight);

        self.metrics.record_request();
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!(query = %text, "autocomplete request superseded");
                    return;
                }
                result = inner.backend.autocomplete(&text) => result,
            };

            match result {
                Ok(terms) => {
                    inner.apply(generation, &text, terms);
                }
                Err(e) => {
                    inner.metrics.record_failure();
                    warn!("Autocomplete failed for {:?}: {}", text, e);
                }
            }
        });
    }

    /// Store `terms` if they answer the latest debounced query
    fn apply(&self, generation: u64, query: &str, terms: Vec<String>) -> bool {
        let flight = self.flight.lock();
        if self.cancel.is_cancelled()
            || flight.generation != generation
            || flight.expected.as_deref() != Some(query)
        {
            self.metrics.record_discarded();
            debug!(query, "discarding stale suggestions");
            return false;
        }

        self.metrics.record_applied();
        self.state.send_replace(SuggestionState {
            terms,
            source_query: query.to_string(),
        });
        true
    }
}
