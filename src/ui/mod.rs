//! Terminal UI rendering.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI frame
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready types
//! - [`renderer`]: entry point
//! - [`components`]: header, search bar, table, overlays
//! - [`helpers`]: cursor movement, truncation, match highlighting
//! - [`theme`]: color schemes and ANSI escapes
//!
//! # Example
//!
//! ```
//! use zcontacts::app::{AppState, Settings};
//! use zcontacts::storage::Preferences;
//! use zcontacts::ui::{render_to_string, Theme};
//!
//! let state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
//! let frame = render_to_string(&state, 24, 80);
//! assert!(frame.contains("Loading contacts..."));
//! ```

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use theme::Theme;
pub use viewmodel::{DialogInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel};
