//! Search controller

use crate::api::SearchBackend;
use crate::config::SearchSettings;
use crate::error::{FetchError, FetchErrorKind};
use crate::metrics::{ControllerMetrics, MetricsSnapshot};
use crate::results::{SearchHit, SearchPage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lifecycle of the current search
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Success {
        query: String,
        results: Vec<SearchHit>,
        total_hits: Option<u64>,
    },
    Failed {
        query: String,
        kind: FetchErrorKind,
        message: String,
    },
}

impl SearchState {
    /// The query this state belongs to
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { query }
            | Self::Success { query, .. }
            | Self::Failed { query, .. } => Some(query),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Success or failure
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failed { .. })
    }

    fn resolved(query: String, outcome: Result<SearchPage, FetchError>) -> Self {
        match outcome {
            Ok(page) => Self::Success {
                query,
                results: page.results,
                total_hits: page.total_hits,
            },
            Err(e) => Self::Failed {
                query,
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Runs one search at a time; the most recent submission always wins.
///
/// A superseded request is not aborted. Its response is dropped when it
/// arrives because its generation no longer matches. Dropping the controller
/// aborts every in-flight request.
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn SearchBackend>,
    timeout: Duration,
    state: watch::Sender<SearchState>,
    target: Mutex<Target>,
    cancel: CancellationToken,
    metrics: ControllerMetrics,
}

#[derive(Default)]
struct Target {
    generation: u64,
    query: Option<String>,
    last_success: Option<(String, SearchPage)>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn SearchBackend>, settings: &SearchSettings) -> Self {
        let (state, _rx) = watch::channel(SearchState::Idle);
        Self {
            inner: Arc::new(Inner {
                backend,
                timeout: settings.timeout(),
                state,
                target: Mutex::new(Target::default()),
                cancel: CancellationToken::new(),
                metrics: ControllerMetrics::new(),
            }),
        }
    }

    /// Start a search for `query`.
    ///
    /// Blank queries are ignored. Returns whether a request was issued; the
    /// state is already `Loading` when this returns true. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            debug!("ignoring blank submission");
            return false;
        }
        if self.inner.cancel.is_cancelled() {
            return false;
        }

        let generation = {
            let mut target = self.inner.target.lock();
            target.generation += 1;
            target.query = Some(query.to_string());
            self.inner.state.send_replace(SearchState::Loading {
                query: query.to_string(),
            });
            target.generation
        };

        info!("Searching for {:?}", query);
        self.inner.metrics.record_request();

        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = inner.cancel.cancelled() => return,
                outcome = tokio::time::timeout(inner.timeout, inner.backend.search(&query)) => {
                    outcome.unwrap_or(Err(FetchError::Timeout))
                }
            };
            inner.resolve(generation, query, outcome);
        });

        true
    }

    /// Current state
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Most recent successful page and its query
    pub fn last_success(&self) -> Option<(String, SearchPage)> {
        self.inner.target.lock().last_success.clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Abort in-flight requests and ignore later submissions
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    /// Apply an outcome if it answers the current target
    fn resolve(
        &self,
        generation: u64,
        query: String,
        outcome: Result<SearchPage, FetchError>,
    ) -> bool {
        let mut target = self.target.lock();
        if self.cancel.is_cancelled()
            || target.generation != generation
            || target.query.as_deref() != Some(query.as_str())
        {
            self.metrics.record_discarded();
            debug!(query = %query, generation, "discarding stale search response");
            return false;
        }

        match &outcome {
            Ok(page) => {
                info!("Search {:?} returned {} results", query, page.results.len());
                target.last_success = Some((query.clone(), page.clone()));
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!("Search failed for {:?}: {}", query, e);
            }
        }

        self.metrics.record_applied();
        self.state.send_replace(SearchState::resolved(query, outcome));
        true
    }
}
