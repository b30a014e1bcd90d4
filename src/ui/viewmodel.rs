//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed
//! by the renderer. They hold display-ready data only: truncated text,
//! highlight ranges, and row flags.
//!
//! # Example
//!
//! ```
//! use zcontacts::ui::viewmodel::{DisplayItem, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     display_items: vec![DisplayItem {
//!         name: "Ann Smith".to_string(),
//!         phone: "+1 555 0100".to_string(),
//!         photo_label: "default photo".to_string(),
//!         has_number: true,
//!         is_selected: true,
//!         is_expanded: false,
//!         name_highlights: vec![(0, 3)],
//!         phone_highlights: vec![],
//!     }],
//!     selected_index: 0,
//!     header: HeaderInfo { title: " Contacts (1) ".to_string() },
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//!     empty_state: None,
//!     search_bar: None,
//!     notification: None,
//!     dialog: None,
//! };
//! assert!(vm.display_items[0].is_selected);
//! ```

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Rows inside the visible window.
    pub display_items: Vec<DisplayItem>,

    /// Index of the selected row within `display_items`.
    pub selected_index: usize,

    pub header: HeaderInfo,
    pub footer: FooterInfo,

    /// Set when there are no rows to show.
    pub empty_state: Option<EmptyState>,

    /// Set in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// Transient message, e.g. "Invalid phone number".
    pub notification: Option<String>,

    /// Permission dialog drawn over the list.
    pub dialog: Option<DialogInfo>,
}

/// One contact row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub name: String,
    pub phone: String,

    /// Short description of the photo shown on the expanded line.
    pub photo_label: String,

    /// Whether call and message can be offered.
    pub has_number: bool,

    pub is_selected: bool,

    /// Expanded rows render a second line with the photo and actions.
    pub is_expanded: bool,

    /// Query matches in `name` as `(start, end)` character indices.
    pub name_highlights: Vec<(usize, usize)>,

    /// Query matches in `phone` as `(start, end)` character indices.
    pub phone_highlights: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text (e.g., "j/k: navigate  Enter: expand").
    pub keybindings: String,
}

/// Message shown in place of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No contacts found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Query as typed.
    pub query: String,

    /// Whether keystrokes currently edit the query.
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogInfo {
    pub title: String,
    pub message: String,
}
