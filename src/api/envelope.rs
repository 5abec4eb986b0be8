//! Response envelope extraction
//!
//! The API has not settled on a single envelope shape, so all tolerance for
//! field-name variation lives here.

use crate::results::{SearchHit, SearchPage};
use serde_json::Value;
use tracing::debug;

/// Keys checked, in order, for the result array
pub const RESULT_KEYS: [&str; 3] = ["results", "items", "documents"];

/// Keys checked, in order, for the total hit count
pub const TOTAL_KEYS: [&str; 3] = ["total_hits", "totalHits", "total"];

/// Keys checked on object-shaped suggestion entries
const TERM_KEYS: [&str; 3] = ["term", "value", "text"];

/// Extract a search page from a decoded body.
///
/// The first key of [`RESULT_KEYS`] holding an array wins. A bare top-level
/// array is accepted as the result list. Anything else is an empty page.
pub fn extract_page(body: &Value) -> SearchPage {
    let array = RESULT_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .or_else(|| body.as_array());

    let results: Vec<SearchHit> = match array {
        Some(items) => items
            .iter()
            .cloned()
            .filter_map(SearchHit::from_value)
            .collect(),
        None => {
            debug!("No result array in search envelope");
            Vec::new()
        }
    };

    let total_hits = TOTAL_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_u64));

    SearchPage {
        results,
        total_hits,
    }
}

/// Extract autocomplete terms from a decoded body.
///
/// A missing `suggestions` field is an empty list. Entries may be plain
/// strings or objects carrying the term under `term`, `value` or `text`.
pub fn extract_suggestions(body: &Value) -> Vec<String> {
    body.get("suggestions")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(suggestion_term).collect())
        .unwrap_or_default()
}

fn suggestion_term(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => TERM_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(String::from),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_key() {
        let body = json!({
            "results": [{"url": "https://x", "title": "X", "snippet": "s", "score": 1.0}],
            "total_hits": 12
        });
        let page = extract_page(&body);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].title.as_deref(), Some("X"));
        assert_eq!(page.total_hits, Some(12));
    }

    #[test]
    fn test_precedence_order() {
        let body = json!({
            "documents": [{"url": "https://d"}],
            "items": [{"url": "https://i"}]
        });
        let page = extract_page(&body);
        assert_eq!(page.results[0].url.as_deref(), Some("https://i"));
    }

    #[test]
    fn test_non_array_key_falls_through() {
        let body = json!({"results": null, "documents": [{"url": "https://d"}]});
        let page = extract_page(&body);
        assert_eq!(page.results[0].url.as_deref(), Some("https://d"));
    }

    #[test]
    fn test_bare_array_and_garbage() {
        let page = extract_page(&json!([{"title": "only"}]));
        assert_eq!(page.results.len(), 1);

        assert!(extract_page(&json!({"hits": 3})).is_empty());
        assert!(extract_page(&json!("nope")).is_empty());
        assert!(extract_page(&Value::Null).is_empty());
    }

    #[test]
    fn test_total_hits_variants() {
        assert_eq!(extract_page(&json!({"totalHits": 5})).total_hits, Some(5));
        assert_eq!(extract_page(&json!({"total": 9})).total_hits, Some(9));
        assert_eq!(extract_page(&json!({"total": -1})).total_hits, None);
    }

    #[test]
    fn test_suggestions() {
        let body = json!({"suggestions": ["cat", {"term": "car"}, 3, {"value": "cab"}]});
        assert_eq!(extract_suggestions(&body), vec!["cat", "car", "cab"]);
        assert!(extract_suggestions(&json!({})).is_empty());
        assert!(extract_suggestions(&json!({"suggestions": "cat"})).is_empty());
    }
}
