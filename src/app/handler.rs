//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place that mutates [`AppState`]. It returns
//! whether the UI needs a redraw and the side effects to run, in order.
//! Time is passed in rather than read, so debouncing and notification expiry
//! are deterministic under test.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `ToggleExpand`
//! - **Contact actions**: `Call`, `Message`, `LaunchFailed`
//! - **Search**: `SearchMode`, `FocusSearchBar`, `FocusResults`, `ExitSearch`,
//!   `Char`, `Backspace`, `Escape`
//! - **Lifecycle**: `Started`, `PermissionResult`, `ConfirmDialog`,
//!   `DismissDialog`, `Refresh`, `Tick`, `CloseFocus`
//! - **Worker**: `WorkerResponse`

use super::modes::{InputMode, SearchFocus, SearchSource};
use super::notification::INVALID_PHONE_NUMBER;
use super::permission::{decide_access, AccessDecision, PermissionDialog};
use super::state::PermissionState;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::storage::Preferences;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::time::Instant;

/// Shown after the user refuses permission.
pub const PERMISSION_DENIED_MESSAGE: &str = "zcontacts cannot show contacts without permission";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    KeyDown,
    KeyUp,
    /// Expands or collapses the selected row.
    ToggleExpand,
    /// Dials the expanded contact.
    Call,
    /// Opens a message to the expanded contact.
    Message,
    CloseFocus,
    /// Re-reads the contact directory, or asks for permission again when
    /// it was refused.
    Refresh,

    SearchMode,
    FocusSearchBar,
    FocusResults,
    ExitSearch,
    Char(char),
    Backspace,
    Escape,

    /// The plugin finished loading.
    Started,
    PermissionResult { granted: bool },
    /// Enter in the permission dialog.
    ConfirmDialog,
    /// Esc in the permission dialog.
    DismissDialog,

    /// A timer armed by `Action::ScheduleTick` fired.
    Tick,

    /// A dial or message command could not be run.
    LaunchFailed { error: String },

    WorkerResponse(WorkerResponse),
}

/// Processes `event` at time `now`.
///
/// Returns `(should_render, actions)`.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for handlers that touch
/// fallible state.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use zcontacts::app::{handle_event, Action, AppState, Event, Settings};
/// use zcontacts::storage::Preferences;
/// use zcontacts::ui::Theme;
///
/// let mut state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
/// let (_, actions) = handle_event(&mut state, &Event::Started, Instant::now())?;
/// assert!(actions.contains(&Action::RequestPermission));
/// # Ok::<(), zcontacts::ContactsError>(())
/// ```
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event, now: Instant) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::ToggleExpand => {
            let updates = state.list.on_item_tapped(state.selected_index);
            tracing::debug!(?updates, "row toggled");
            Ok((!updates.is_empty(), vec![]))
        }
        Event::Call | Event::Message => Ok(handle_contact_action(state, event, now)),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::Refresh => Ok(handle_refresh(state)),

        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            // Enter skips the remaining debounce delay.
            let mut actions = vec![];
            if state.debouncer.is_pending() {
                state.debouncer.cancel_all();
                actions.extend(state.apply_query(state.search_query.clone()));
            }
            if state.search_query.trim().is_empty() {
                state.input_mode = InputMode::Normal;
            } else {
                state.input_mode = InputMode::Search(SearchFocus::Navigating);
            }
            Ok((true, actions))
        }
        Event::ExitSearch => Ok(exit_search(state)),
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            Ok((true, vec![schedule_search(state, now)]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            if state.search_query.pop().is_none() {
                return Ok((false, vec![]));
            }
            Ok((true, vec![schedule_search(state, now)]))
        }
        Event::Escape => {
            if matches!(state.input_mode, InputMode::Search(_)) {
                return Ok(exit_search(state));
            }
            match state.list.expanded_position() {
                Some(open) => {
                    state.list.on_item_tapped(open);
                    Ok((true, vec![]))
                }
                None => Ok((false, vec![])),
            }
        }

        Event::Started => Ok(handle_started(state)),
        Event::PermissionResult { granted } => Ok(handle_permission_result(state, *granted, now)),
        Event::ConfirmDialog => {
            if state.dialog.take().is_none() {
                return Ok((false, vec![]));
            }
            tracing::debug!("re-requesting permission from dialog");
            Ok((true, vec![Action::RequestPermission]))
        }
        Event::DismissDialog => {
            if state.dialog.take().is_none() {
                return Ok((false, vec![]));
            }
            let tick = state.notify(PERMISSION_DENIED_MESSAGE, now);
            Ok((true, vec![tick]))
        }

        Event::Tick => {
            let mut render = state.expire_notification(now);
            let mut actions = vec![];
            if let Some(query) = state.debouncer.poll(now) {
                tracing::debug!(query = %query, "debounced search fired");
                actions.extend(state.apply_query(query));
                render = true;
            }
            Ok((render, actions))
        }

        Event::LaunchFailed { error } => {
            tracing::warn!(error = %error, "contact action command failed");
            let tick = state.notify(format!("Could not start command: {error}"), now);
            Ok((true, vec![tick]))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response, now)),
    }
}

fn schedule_search(state: &mut AppState, now: Instant) -> Action {
    let deadline = state.debouncer.schedule(state.search_query.clone(), now);
    Action::ScheduleTick { after: deadline.saturating_duration_since(now) }
}

fn exit_search(state: &mut AppState) -> (bool, Vec<Action>) {
    tracing::debug!(query = %state.search_query, "exiting search mode");
    state.input_mode = InputMode::Normal;
    state.search_query.clear();
    state.debouncer.cancel_all();

    if state.applied_query.is_empty() {
        return (true, vec![]);
    }
    (true, state.apply_query(String::new()).into_iter().collect())
}

fn handle_contact_action(state: &mut AppState, event: &Event, now: Instant) -> (bool, Vec<Action>) {
    let Some(record) = state.list.expanded_record() else {
        tracing::debug!("no expanded contact, ignoring action");
        return (false, vec![]);
    };

    if !record.has_dialable_number() {
        tracing::debug!(contact = %record.id, "contact has no phone number");
        let tick = state.notify(INVALID_PHONE_NUMBER, now);
        return (true, vec![tick]);
    }

    let number = record.phone_number.trim().to_string();
    tracing::debug!(contact = %record.id, "launching contact action");
    let action = if *event == Event::Call {
        Action::Dial { number }
    } else {
        Action::Message { number }
    };
    (false, vec![action])
}

/// Query to send with a full refetch. The in-memory source always reads
/// everything and filters afterwards.
fn refetch_query(state: &AppState) -> Option<String> {
    match state.settings.search_source {
        SearchSource::Memory => None,
        SearchSource::Directory => Some(state.applied_query.clone()).filter(|q| !q.trim().is_empty()),
    }
}

fn handle_refresh(state: &mut AppState) -> (bool, Vec<Action>) {
    match state.permission {
        PermissionState::Granted => {
            let query = refetch_query(state);
            (true, vec![state.begin_fetch(query)])
        }
        PermissionState::Denied => {
            state.dialog = None;
            (true, vec![Action::RequestPermission])
        }
        PermissionState::Unknown => (false, vec![]),
    }
}

/// The start-up request doubles as the "is granted" probe: Zellij answers a
/// repeated request without prompting once the user has decided.
fn handle_started(state: &mut AppState) -> (bool, Vec<Action>) {
    let mut actions = vec![Action::RequestPermission];

    if !state.permission_requested {
        state.permission_requested = true;
        state.first_request_pending = true;
        actions.push(Action::PostToWorker(WorkerMessage::save_preferences(
            Preferences::default().with_permission_requested(),
        )));
    }
    (false, actions)
}

fn handle_permission_result(state: &mut AppState, granted: bool, now: Instant) -> (bool, Vec<Action>) {
    let requested_before = !std::mem::take(&mut state.first_request_pending);
    let decision = decide_access(granted, requested_before);
    tracing::debug!(granted, requested_before, ?decision, "permission result");

    match decision {
        AccessDecision::Fetch => {
            state.permission = PermissionState::Granted;
            state.dialog = None;
            let query = refetch_query(state);
            (true, vec![state.begin_fetch(query)])
        }
        // Refused on the very first prompt.
        AccessDecision::Request => {
            state.permission = PermissionState::Denied;
            let tick = state.notify(PERMISSION_DENIED_MESSAGE, now);
            (true, vec![tick])
        }
        AccessDecision::ShowSettingsDialog => {
            state.permission = PermissionState::Denied;
            state.dialog = Some(PermissionDialog::default());
            (true, vec![])
        }
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse, now: Instant) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::ContactsFetched { generation, contacts } => {
            if *generation != state.fetch.generation {
                tracing::debug!(
                    generation,
                    latest = state.fetch.generation,
                    "dropping stale contact fetch"
                );
                return (false, vec![]);
            }

            let first_load = !state.fetch.loaded;
            let had_expansion = state.list.expanded_position().is_some();
            let was_refreshing = state.fetch.in_flight;
            let diff = state.accept_fetch(contacts.clone());

            tracing::debug!(
                generation,
                count = contacts.len(),
                removed = diff.removed.len(),
                inserted = diff.inserted.len(),
                changed = diff.changed.len(),
                "contacts applied"
            );
            let render = first_load || had_expansion || was_refreshing || !diff.is_empty();
            (render, vec![])
        }
        WorkerResponse::PreferencesSaved => (false, vec![]),
        WorkerResponse::Error { generation, message } => {
            if generation.is_some_and(|g| g != state.fetch.generation) {
                tracing::debug!(generation = ?generation, "dropping stale worker error");
                return (false, vec![]);
            }
            tracing::error!("Worker error: {}", message);
            if generation.is_some() {
                state.fetch.in_flight = false;
                state.fetch.loaded = true;
            }
            let tick = state.notify(message.clone(), now);
            (true, vec![tick])
        }
    }
}
