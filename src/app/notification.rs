//! Short-lived status messages shown above the footer.

use std::time::{Duration, Instant};

/// Default display time for a notification.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Message shown when a call or message is attempted without a number.
pub const INVALID_PHONE_NUMBER: &str = "Invalid phone number";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self { message: message.into(), expires_at: now + duration }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
