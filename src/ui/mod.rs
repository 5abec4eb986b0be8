//! Terminal presentation layer
//!
//! Renders controller state and forwards user events. Contains no request
//! logic of its own.

mod commands;
mod render;
mod state;

pub use commands::{Command, HELP};
pub use render::{page_title, render_hit, render_search_state, render_suggestions};
pub use state::{InputState, SearchBox};
