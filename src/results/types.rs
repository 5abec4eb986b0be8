//! Result type definitions

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// A single ranked hit as returned by the API.
///
/// Every field is optional. Fields that are missing or carry an unexpected
/// type stay in `extra`, so serializing a hit yields the object it was built
/// from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
    /// Everything else the backend sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchHit {
    /// Build a hit from one element of the result array.
    ///
    /// Returns `None` for non-object elements.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut extra) = value else {
            return None;
        };

        let url = take_string(&mut extra, "url");
        let title = take_string(&mut extra, "title");
        let snippet = take_string(&mut extra, "snippet");
        let score = match extra.get("score") {
            Some(Value::Number(_)) => match extra.remove("score") {
                Some(Value::Number(n)) => Some(n),
                _ => None,
            },
            _ => None,
        };

        Some(Self {
            url,
            title,
            snippet,
            score,
            extra,
        })
    }

    /// Relevance score as a float, whatever its JSON number form
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_ref().and_then(Number::as_f64)
    }

    /// True when none of the renderable fields are present
    pub fn is_bare(&self) -> bool {
        self.url.is_none() && self.title.is_none() && self.snippet.is_none()
    }

    /// The hit as the JSON object it was built from
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// One successful search response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchHit>,
    /// Total hit count reported by the backend, if any
    pub total_hits: Option<u64>,
}

impl SearchPage {
    pub fn new(results: Vec<SearchHit>) -> Self {
        Self {
            results,
            total_hits: None,
        }
    }

    pub fn with_total_hits(mut self, total: u64) -> Self {
        self.total_hits = Some(total);
        self
    }

    /// Reported total, or the number of hits on this page
    pub fn hit_count(&self) -> u64 {
        self.total_hits.unwrap_or(self.results.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
