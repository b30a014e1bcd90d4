//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the domain, contacts,
//! storage, and worker layers. Data flows one way:
//!
//! ```text
//! Key / Timer / Permission → Event → handle_event → AppState → Actions
//!                                 ↑                                ↓
//!                                 └────── WorkerResponse ──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted by the handler
//! - [`debounce`]: search keystroke debouncing
//! - [`diff`]: row diffs between two contact lists
//! - [`expansion`]: displayed rows with at most one expanded
//! - [`filter`]: case-insensitive name and number matching
//! - [`handler`]: event processing
//! - [`modes`]: input mode state machine
//! - [`notification`]: transient messages
//! - [`permission`]: permission decision and dialog
//! - [`state`]: the state object and view model computation
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use zcontacts::app::{handle_event, AppState, Event, Settings};
//! use zcontacts::storage::Preferences;
//! use zcontacts::ui::Theme;
//!
//! let mut state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
//! let (should_render, _actions) = handle_event(&mut state, &Event::KeyDown, Instant::now())?;
//! assert!(should_render);
//! # Ok::<(), zcontacts::ContactsError>(())
//! ```

pub mod actions;
pub mod debounce;
pub mod diff;
pub mod expansion;
pub mod filter;
pub mod handler;
pub mod modes;
pub mod notification;
pub mod permission;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{InputMode, SearchFocus, SearchSource};
pub use state::{AppState, PermissionState, Settings};
