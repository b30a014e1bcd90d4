//! Persisted preference records.

use serde::{Deserialize, Serialize};

/// Plugin-scoped preferences, stored as one JSON document.
///
/// Unknown or missing fields fall back to their defaults so older files keep
/// loading after fields are added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Whether the plugin has asked for its permissions at least once.
    ///
    /// Set the first time a request is issued and never cleared; a later
    /// denial then leads to the settings dialog instead of a silent re-ask.
    pub permission_requested: bool,
}

impl Preferences {
    /// ```
    /// use zcontacts::storage::Preferences;
    ///
    /// let prefs = Preferences::default().with_permission_requested();
    /// assert!(prefs.permission_requested);
    /// ```
    #[must_use]
    pub const fn with_permission_requested(mut self) -> Self {
        self.permission_requested = true;
        self
    }
}
