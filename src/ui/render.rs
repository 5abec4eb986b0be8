//! Plain-text rendering of controller state

use crate::controller::SearchState;
use crate::results::SearchHit;
use std::fmt::Write;

/// Window title for a results page
pub fn page_title(query: &str) -> String {
    format!("{} - Rarefactor Search", query)
}

/// Numbered dropdown entries, as picked with `:pick N`
pub fn render_suggestions(terms: &[String]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i + 1, term);
    }
    out
}

/// One result card. Hits without a title, url or snippet are shown as JSON.
pub fn render_hit(hit: &SearchHit) -> String {
    if hit.is_bare() {
        return serde_json::to_string_pretty(&hit.to_json()).unwrap_or_default();
    }

    let mut out = String::new();
    if let Some(ref title) = hit.title {
        let _ = writeln!(out, "{}", title);
    }
    if let Some(ref url) = hit.url {
        let _ = writeln!(out, "  {}", url);
    }
    if let Some(ref snippet) = hit.snippet {
        let _ = writeln!(out, "  {}", snippet);
    }
    out
}

/// The results area for the current search state
pub fn render_search_state(state: &SearchState) -> String {
    match state {
        SearchState::Idle => String::new(),
        SearchState::Loading { .. } => "Searching…\n".to_string(),
        SearchState::Failed { message, .. } => format!("Error: {}\n", message),
        SearchState::Success {
            query,
            results,
            total_hits,
        } => {
            if results.is_empty() {
                return format!("No results found for \"{}\".\n", query);
            }
            let mut out = format!(
                "Found {} results\n\n",
                total_hits.unwrap_or(results.len() as u64)
            );
            for hit in results {
                out.push_str(&render_hit(hit));
                out.push('\n');
            }
            out
        }
    }
}
