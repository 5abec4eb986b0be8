//! Search API access
//!
//! The controllers talk to the API only through [`SearchBackend`], so the
//! HTTP implementation can be wrapped (see [`crate::cache`]) or replaced.

mod backend;
pub mod envelope;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{HttpBackend, SearchBackend};
pub use envelope::{extract_page, extract_suggestions};
