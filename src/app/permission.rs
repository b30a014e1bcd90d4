//! Access decision for the contact directory.
//!
//! Inputs are passed in explicitly: whether Zellij granted the plugin's
//! permissions and whether the user has been asked before (the persisted
//! [`Preferences::permission_requested`](crate::storage::Preferences) flag).

/// What the plugin should do after a permission result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Permission is held; fetch contacts.
    Fetch,
    /// Never asked before; request permission and remember that we asked.
    Request,
    /// Asked before and still denied; explain and offer to ask again.
    ShowSettingsDialog,
}

/// ```
/// use zcontacts::app::permission::{decide_access, AccessDecision};
///
/// assert_eq!(decide_access(true, true), AccessDecision::Fetch);
/// assert_eq!(decide_access(false, false), AccessDecision::Request);
/// assert_eq!(decide_access(false, true), AccessDecision::ShowSettingsDialog);
/// ```
#[must_use]
pub const fn decide_access(granted: bool, requested_before: bool) -> AccessDecision {
    match (granted, requested_before) {
        (true, _) => AccessDecision::Fetch,
        (false, false) => AccessDecision::Request,
        (false, true) => AccessDecision::ShowSettingsDialog,
    }
}

/// Dialog shown when permission was refused after the first request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDialog {
    pub title: String,
    pub message: String,
}

impl Default for PermissionDialog {
    fn default() -> Self {
        Self {
            title: "Permission Required".to_string(),
            message: "zcontacts needs permission to read your contact directory and run \
                      commands. Press Enter to grant it or Esc to continue without contacts."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_always_fetches() {
        assert_eq!(decide_access(true, false), AccessDecision::Fetch);
        assert_eq!(decide_access(true, true), AccessDecision::Fetch);
    }

    #[test]
    fn denial_escalates_only_after_first_request() {
        assert_eq!(decide_access(false, false), AccessDecision::Request);
        assert_eq!(decide_access(false, true), AccessDecision::ShowSettingsDialog);
    }
}
