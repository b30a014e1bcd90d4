//! zcontacts: a Zellij plugin for browsing vCard contacts.
//!
//! The plugin reads a directory of `.vcf` files and shows the contacts in a
//! scrollable list. It provides:
//! - Case-insensitive search by name or number, debounced while typing
//! - Expandable rows (at most one open) with the contact's photo details
//! - Call and message actions through configurable host commands
//! - A permission flow that remembers whether the user was already asked
//! - Background reading of the contact directory via a Zellij worker

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Events, handler, actions                         │
//! │  - Filter, debouncer, expansion, diff               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI (ui/)      │   │ Storage       │   │ Worker        │
//! │ - Rendering   │   │ (storage/)    │   │ (worker/)     │
//! │ - Theming     │   │ - Preferences │   │ - Fetches     │
//! │ - Components  │   │ - JSON I/O    │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                  │
//!                                         ┌───────────────┐
//!                                         │ Contacts      │
//!                                         │ (contacts/)   │
//!                                         │ - vCard parse │
//!                                         │ - Photos      │
//!                                         └───────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/zcontacts.wasm" {
//!         contacts_dir "~/.contacts"
//!         search_debounce_ms "300"
//!         search_source "memory"
//!         dial_command "xdg-open tel:{number}"
//!         message_command "xdg-open smsto:{number}"
//!         notification_ms "2000"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::time::Instant;
//! use zcontacts::{handle_event, initialize, Config, Event};
//! use zcontacts::storage::Preferences;
//!
//! let config = Config::from_zellij(&BTreeMap::new());
//! let mut state = initialize(&config, &Preferences::default());
//!
//! let (_, actions) = handle_event(&mut state, &Event::Started, Instant::now())?;
//! assert!(!actions.is_empty());
//! # Ok::<(), zcontacts::ContactsError>(())
//! ```

pub mod app;
pub mod contacts;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus, SearchSource, Settings};
pub use domain::{ContactId, ContactRecord, ContactsError, Photo, Result};
pub use ui::Theme;

use infrastructure::expand_tilde;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_CONTACTS_DIR: &str = "~/.contacts";
pub const DEFAULT_DIAL_COMMAND: &str = "xdg-open tel:{number}";
pub const DEFAULT_MESSAGE_COMMAND: &str = "xdg-open smsto:{number}";

/// Accepted range for `search_debounce_ms`.
const DEBOUNCE_RANGE_MS: (u64, u64) = (50, 2000);

/// Plugin configuration parsed from Zellij's configuration map.
///
/// Missing or unparsable values fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Contact directory as configured; `~` is the user's home.
    pub contacts_dir: String,

    /// Quiet period before a search query is applied. Clamped to 50..=2000.
    pub search_debounce_ms: u64,

    pub search_source: SearchSource,

    /// Command template for calls. `{number}` is replaced by the number.
    pub dial_command: String,

    /// Command template for messages.
    pub message_command: String,

    /// How long notifications stay visible.
    pub notification_ms: u64,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contacts_dir: DEFAULT_CONTACTS_DIR.to_string(),
            search_debounce_ms: u64::try_from(app::debounce::DEFAULT_DELAY.as_millis()).unwrap_or(300),
            search_source: SearchSource::Memory,
            dial_command: DEFAULT_DIAL_COMMAND.to_string(),
            message_command: DEFAULT_MESSAGE_COMMAND.to_string(),
            notification_ms: u64::try_from(app::notification::DEFAULT_DURATION.as_millis()).unwrap_or(2000),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use zcontacts::{Config, SearchSource};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("contacts_dir".to_string(), "~/cards".to_string());
    /// map.insert("search_debounce_ms".to_string(), "10".to_string());
    /// map.insert("search_source".to_string(), "directory".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.contacts_dir, "~/cards");
    /// assert_eq!(config.search_debounce_ms, 50);
    /// assert_eq!(config.search_source, SearchSource::Directory);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| config.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()).map(String::from);
        let number = |key: &str| config.get(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            contacts_dir: non_blank("contacts_dir").unwrap_or(defaults.contacts_dir),
            search_debounce_ms: number("search_debounce_ms")
                .map_or(defaults.search_debounce_ms, |ms| ms.clamp(DEBOUNCE_RANGE_MS.0, DEBOUNCE_RANGE_MS.1)),
            search_source: config
                .get("search_source")
                .and_then(|v| SearchSource::parse(v))
                .unwrap_or(defaults.search_source),
            dial_command: non_blank("dial_command").unwrap_or(defaults.dial_command),
            message_command: non_blank("message_command").unwrap_or(defaults.message_command),
            notification_ms: number("notification_ms").unwrap_or(defaults.notification_ms),
            theme_name: non_blank("theme"),
            theme_file: non_blank("theme_file"),
            trace_level: non_blank("trace_level"),
        }
    }

    /// Runtime settings for [`AppState`], with sandbox paths resolved.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            contacts_dir: expand_tilde(&self.contacts_dir),
            search_source: self.search_source,
            debounce_delay: Duration::from_millis(self.search_debounce_ms),
            notification_duration: Duration::from_millis(self.notification_ms),
        }
    }

    /// Theme from `theme_file`, else `theme_name`, else the default. Load
    /// failures are logged and fall back to the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Creates the initial application state.
///
/// `preferences` carries the persisted "already asked for permission" flag.
#[must_use]
pub fn initialize(config: &Config, preferences: &storage::Preferences) -> AppState {
    tracing::debug!(
        contacts_dir = %config.contacts_dir,
        search_source = ?config.search_source,
        permission_requested = preferences.permission_requested,
        "initializing zcontacts plugin"
    );

    AppState::new(config.settings(), preferences, config.theme())
}
