//! Terminal input parsing
//!
//! A plain line replaces the query text as if it had been typed; lines
//! starting with `:` are presentation events.

/// One user event from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the input text
    Type(String),
    /// Enter key
    Enter,
    /// Pick the Nth visible suggestion (0-based)
    Pick(usize),
    Focus,
    Blur,
    /// Escape key
    Dismiss,
    /// Re-render suggestions and results
    Show,
    Stats,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Type(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("");
        match name {
            "enter" | "e" => Self::Enter,
            "pick" | "p" => match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                Some(n) if n >= 1 => Self::Pick(n - 1),
                _ => Self::Unknown(line.to_string()),
            },
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "esc" => Self::Dismiss,
            "show" | "s" => Self::Show,
            "stats" => Self::Stats,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            // "::text" types a literal leading colon
            _ if rest.starts_with(':') => Self::Type(rest.to_string()),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type a line to replace the query text. Commands:
  :enter, :e       submit the current text
  :pick N, :p N    pick suggestion N
  :focus / :blur   focus or blur the input
  :esc             dismiss the suggestion list
  :show, :s        show suggestions and results
  :stats           request counters
  :help            this text
  :quit, :q        exit
";
