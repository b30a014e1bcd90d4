//! Path handling for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is reachable under `/host`, which
//! Zellij maps to the directory it was started from (normally `$HOME`), and
//! each plugin gets a private `/data` directory.

use std::path::PathBuf;

/// Plugin-private directory holding `preferences.json`.
///
/// ```
/// use zcontacts::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/data"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

/// Maps a `~`-relative path into the sandbox.
///
/// ```
/// use zcontacts::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/.contacts"), "/host/.contacts");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/srv/cards"), "/srv/cards");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path == "~" {
        "/host".to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("/host/{rest}")
    } else {
        path.to_string()
    }
}

/// Inverse of [`expand_tilde`], for showing sandbox paths to the user.
///
/// ```
/// use zcontacts::infrastructure::display_path;
///
/// assert_eq!(display_path("/host/.contacts"), "~/.contacts");
/// assert_eq!(display_path("/hostile"), "/hostile");
/// ```
#[must_use]
pub fn display_path(path: &str) -> String {
    if path == "/host" {
        "~".to_string()
    } else if let Some(rest) = path.strip_prefix("/host/") {
        format!("~/{rest}")
    } else {
        path.to_string()
    }
}
