//! Error types for the zcontacts plugin.
//!
//! [`ContactsError`] is the single error type returned across layers, with a
//! [`Result`] alias for convenience. Recoverable conditions that the user
//! should never see as errors (a missing phone number, an undecodable photo)
//! are deliberately not represented here; they resolve to empty values or the
//! default photo at the point where they occur.

use thiserror::Error;

/// The main error type for zcontacts operations.
///
/// # Examples
///
/// ```
/// use zcontacts::ContactsError;
///
/// fn open_directory() -> Result<(), ContactsError> {
///     Err(ContactsError::Directory("~/.contacts does not exist".to_string()))
/// }
///
/// assert!(open_directory().is_err());
/// ```
#[derive(Debug, Error)]
pub enum ContactsError {
    /// Reading or writing the preference file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The contact directory is missing or cannot be enumerated.
    #[error("Contact directory error: {0}")]
    Directory(String),

    /// A vCard could not be parsed at all.
    ///
    /// Individual malformed properties are skipped instead; this variant is
    /// reserved for input that contains no card structure.
    #[error("vCard parse error: {0}")]
    Parse(String),
}

/// A specialized `Result` type for zcontacts operations.
pub type Result<T> = std::result::Result<T, ContactsError>;
