//! JSON file-based preference store.
//!
//! Writes go to a temporary sibling file which is then renamed over the
//! target, so a crash mid-write leaves the previous file intact.

use crate::domain::error::{ContactsError, Result};
use crate::storage::backend::PreferenceStore;
use crate::storage::models::Preferences;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the preference document inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// On-disk container.
///
/// ```json
/// {
///   "version": 1,
///   "preferences": { "permission_requested": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferenceFile {
    version: u32,
    #[serde(default)]
    preferences: Preferences,
}

impl Default for PreferenceFile {
    fn default() -> Self {
        Self {
            version: 1,
            preferences: Preferences::default(),
        }
    }
}

/// Preference store backed by a single JSON file.
///
/// The document is cached in memory after the first read. This type is
/// `Send` but not `Sync`; each thread opens its own instance.
pub struct JsonPreferenceStore {
    file_path: PathBuf,
    data: PreferenceFile,
    /// The file on disk could not be parsed; the next save rewrites it.
    needs_rewrite: bool,
}

impl JsonPreferenceStore {
    /// Opens the store at `file_path`, creating parent directories.
    ///
    /// A missing or unparsable file yields default preferences; nothing is
    /// written until the first [`save`](PreferenceStore::save), which
    /// replaces an unparsable file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// existing file cannot be read.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening preference store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (data, needs_rewrite) = if file_path.exists() {
            match Self::load_from_file(&file_path) {
                Ok(data) => (data, false),
                Err(ContactsError::Storage(e)) => {
                    tracing::warn!(path = ?file_path, error = %e, "discarding unreadable preference file");
                    (PreferenceFile::default(), true)
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::debug!("no preference file yet, using defaults");
            (PreferenceFile::default(), false)
        };

        Ok(Self { file_path, data, needs_rewrite })
    }

    /// Opens `preferences.json` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// See [`JsonPreferenceStore::new`].
    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        Self::new(data_dir.join(PREFERENCES_FILE))
    }

    /// Parse failures are reported as [`ContactsError::Storage`], read
    /// failures as [`ContactsError::Io`].
    fn load_from_file(path: &Path) -> Result<PreferenceFile> {
        let contents = std::fs::read_to_string(path)?;
        let data: PreferenceFile = serde_json::from_str(&contents)
            .map_err(|e| ContactsError::Storage(format!("failed to parse preferences: {e}")))?;

        tracing::debug!(
            version = data.version,
            permission_requested = data.preferences.permission_requested,
            "loaded preferences"
        );
        Ok(data)
    }

    fn write_atomically(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ContactsError::Storage(format!("failed to serialize preferences: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Preferences {
        self.data.preferences.clone()
    }

    fn save(&mut self, preferences: &Preferences) -> Result<()> {
        let _span = tracing::debug_span!("json_save_preferences",
            permission_requested = preferences.permission_requested
        ).entered();

        if !self.needs_rewrite && &self.data.preferences == preferences && self.file_path.exists() {
            tracing::trace!("preferences unchanged, skipping write");
            return Ok(());
        }

        self.data.preferences = preferences.clone();
        self.write_atomically()?;
        self.needs_rewrite = false;
        tracing::debug!("preferences saved");
        Ok(())
    }
}
