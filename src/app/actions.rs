//! Side effects requested by the event handler.
//!
//! The handler stays free of Zellij calls; `main.rs` executes these in order
//! after each event.

use crate::worker::WorkerMessage;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a request to the background worker.
    PostToWorker(WorkerMessage),

    /// Asks Zellij for the plugin's permissions. Zellij answers without
    /// prompting when the user has already decided.
    RequestPermission,

    /// Runs the configured dial command for `number`.
    Dial { number: String },

    /// Runs the configured message command for `number`.
    Message { number: String },

    /// Arms a one-shot timer; it arrives back as `Event::Tick`.
    ScheduleTick { after: Duration },
}
