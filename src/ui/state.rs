//! Search box view model shared by the terminal front end

use crate::api::SearchBackend;
use crate::config::Settings;
use crate::controller::{SearchController, SearchState, SuggestionController, SuggestionState};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Input field state owned by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub text: String,
    pub focused: bool,
    /// Set by a pick, Enter, blur or Escape; cleared by typing
    pub dismissed: bool,
}

/// An input field with a suggestion dropdown and a results list.
///
/// Holds the query text and dropdown visibility; all request decisions are
/// left to the two controllers.
pub struct SearchBox {
    input: Mutex<InputState>,
    suggestions: SuggestionController,
    search: SearchController,
}

impl SearchBox {
    /// Must be called from within a Tokio runtime
    pub fn new(backend: Arc<dyn SearchBackend>, settings: &Settings) -> Self {
        Self {
            input: Mutex::new(InputState {
                focused: true,
                ..Default::default()
            }),
            suggestions: SuggestionController::new(backend.clone(), &settings.suggest),
            search: SearchController::new(backend, &settings.search),
        }
    }

    /// A keystroke replaced the input text
    pub fn type_text(&self, text: &str) {
        {
            let mut input = self.input.lock();
            input.text = text.to_string();
            input.dismissed = false;
        }
        self.suggestions.on_query_change(text);
    }

    /// Enter key or search button. Returns whether a search started.
    pub fn press_enter(&self) -> bool {
        let text = {
            let mut input = self.input.lock();
            input.dismissed = true;
            input.text.clone()
        };
        self.search.submit(&text)
    }

    /// Pick the suggestion at `index` from the visible list.
    ///
    /// The list is dismissed before the search is submitted.
    pub fn select_suggestion(&self, index: usize) -> Option<String> {
        let term = self.visible_suggestions().get(index).cloned()?;
        {
            let mut input = self.input.lock();
            input.dismissed = true;
            input.text = term.clone();
        }
        self.suggestions.on_query_change(&term);
        self.search.submit(&term);
        Some(term)
    }

    pub fn focus(&self) {
        let mut input = self.input.lock();
        input.focused = true;
        input.dismissed = false;
    }

    pub fn blur(&self) {
        let mut input = self.input.lock();
        input.focused = false;
        input.dismissed = true;
    }

    pub fn dismiss_suggestions(&self) {
        self.input.lock().dismissed = true;
    }

    /// Suggestions the dropdown should show right now
    pub fn visible_suggestions(&self) -> Vec<String> {
        let input = self.input.lock();
        if !input.focused
            || input.dismissed
            || input.text.chars().count() < self.suggestions.min_chars()
        {
            return Vec::new();
        }
        self.suggestions.suggestions()
    }

    pub fn input(&self) -> InputState {
        self.input.lock().clone()
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<SuggestionState> {
        self.suggestions.subscribe()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    pub fn suggestion_controller(&self) -> &SuggestionController {
        &self.suggestions
    }

    pub fn search_controller(&self) -> &SearchController {
        &self.search
    }

    /// Tear down both controllers
    pub fn shutdown(&self) {
        self.suggestions.shutdown();
        self.search.shutdown();
    }
}
