//! Search result types
//!
//! Hits are passed through from the API without validation or re-ranking.

mod types;

pub use types::{SearchHit, SearchPage};
