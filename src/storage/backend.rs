//! Preference store abstraction.
//!
//! The handler never touches the store directly. The plugin reads the flag
//! once at load time and the worker writes it back, so both sides only need
//! this small trait.

use crate::domain::error::Result;
use crate::storage::models::Preferences;

/// Key-value persistence for [`Preferences`].
///
/// # Implementations
///
/// - [`JsonPreferenceStore`](crate::storage::JsonPreferenceStore): JSON file
///   with atomic writes
///
/// # Examples
///
/// ```no_run
/// use zcontacts::storage::{JsonPreferenceStore, PreferenceStore};
/// use std::path::PathBuf;
///
/// let mut store = JsonPreferenceStore::new(PathBuf::from("/tmp/preferences.json"))?;
/// let prefs = store.load();
/// store.save(&prefs.with_permission_requested())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait PreferenceStore: Send {
    /// Returns the current preferences.
    fn load(&self) -> Preferences;

    /// Replaces the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be persisted.
    fn save(&mut self, preferences: &Preferences) -> Result<()>;
}
