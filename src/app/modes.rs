//! Input mode state machine and search source selection.
//!
//! The plugin is always in one of two input modes:
//! - **Normal**: list navigation, expand/collapse, call and message
//! - **Search**: typing a query or navigating the filtered results
//!
//! The permission dialog, when shown, captures input regardless of mode.

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query.
    Typing,

    /// Keystrokes navigate the filtered list; `/` returns to typing.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// j/k navigate, Enter/Space expand, c call, m message, / search,
    /// r refresh, q quit.
    Normal,

    Search(SearchFocus),
}

/// Where a debounced query is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSource {
    /// Filter the last fetched list in memory.
    #[default]
    Memory,

    /// Re-fetch from the contact directory with the query pushed down.
    Directory,
}

impl SearchSource {
    /// Parses a configuration value; unknown values yield `None`.
    ///
    /// ```
    /// use zcontacts::app::SearchSource;
    ///
    /// assert_eq!(SearchSource::parse("Directory"), Some(SearchSource::Directory));
    /// assert_eq!(SearchSource::parse("cloud"), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "directory" => Some(Self::Directory),
            _ => None,
        }
    }
}
