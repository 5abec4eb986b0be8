//! Rarefactor: query interaction controller for a search front end
//!
//! Turns a stream of keystrokes into a disciplined sequence of autocomplete
//! and search requests against the Rarefactor HTTP API, and reconciles their
//! out-of-order responses with what the user currently asked for.

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod metrics;
pub mod network;
pub mod results;
pub mod ui;

pub use config::Settings;
pub use controller::{SearchController, SearchState, SuggestionController, SuggestionState};
pub use error::{FetchError, FetchErrorKind};
pub use results::{SearchHit, SearchPage};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default quiet interval before an autocomplete request, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Queries shorter than this never reach the autocomplete endpoint
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Default time a search may stay loading, in seconds
pub const DEFAULT_SEARCH_TIMEOUT: f64 = 10.0;
