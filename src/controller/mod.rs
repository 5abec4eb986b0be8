//! Query interaction controllers
//!
//! Two independent state machines keyed on the same query text: suggestions
//! follow typing through a debounce, searches follow explicit submission.
//! They share no state and are composed only by the presentation layer.

mod search;
mod suggest;

pub use search::{SearchController, SearchState};
pub use suggest::{SuggestionController, SuggestionState};
