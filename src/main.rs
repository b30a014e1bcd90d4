//! Zellij plugin wrapper and entry point.
//!
//! Translates Zellij events into library [`Event`]s, runs the library
//! handler, and executes the returned [`Action`]s through the Zellij API.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │ IPC (JSON)   │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  ContactsWorker  │   │  ← vCard reads, preference writes
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Everywhere: `Ctrl+n` / `Ctrl+p` move down / up.
//!
//! Normal mode:
//! - `j`/`Down`, `k`/`Up`: move
//! - `Enter`/`Space`: expand or collapse the selected contact
//! - `c`: call, `m`: message the expanded contact
//! - `/`: search, `r`: refresh, `Esc`: collapse, `q`: close
//!
//! Search mode, typing: characters edit the query, `Enter` jumps to the
//! results, `Esc` leaves search.
//!
//! Search mode, results: `j`/`k` move, `Enter` expands, `c`/`m` act,
//! `/` edits the query, `Esc` leaves search.
//!
//! Permission dialog: `Enter` asks again, `Esc` dismisses, `q` closes.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::time::Instant;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use zcontacts::app::{AppState, SearchFocus};
use zcontacts::infrastructure::{command_line, get_data_dir};
use zcontacts::storage::{JsonPreferenceStore, PreferenceStore, Preferences};
use zcontacts::worker::{ContactsWorker, WorkerMessage, WorkerResponse};
use zcontacts::{handle_event, Action, Config, Event, InputMode};

register_plugin!(State);
register_worker!(ContactsWorker, contacts_worker, CONTACTS_WORKER);

/// Name of the worker and of the messages exchanged with it.
const WORKER_NAME: &str = "contacts";

/// `RunCommandResult` context key marking contact action commands.
const COMMAND_CONTEXT_KEY: &str = "zcontacts_action";

struct State {
    app: AppState,
    dial_command: String,
    message_command: String,
}

impl Default for State {
    fn default() -> Self {
        let config = Config::default();
        Self {
            app: zcontacts::initialize(&config, &Preferences::default()),
            dial_command: config.dial_command,
            message_command: config.message_command,
        }
    }
}

impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        if let Err(e) = zcontacts::observability::init_tracing(&config) {
            eprintln!("zcontacts: tracing disabled: {e}");
        }

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        let preferences = Self::load_preferences();
        self.app = zcontacts::initialize(&config, &preferences);
        self.dial_command.clone_from(&config.dial_command);
        self.message_command.clone_from(&config.message_command);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
            EventType::RunCommandResult,
            EventType::Timer,
        ]);

        self.dispatch(Event::Started);
        tracing::debug!("plugin load complete - waiting for permission result");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!(
            "plugin_update_event",
            otel.name = %format!("plugin_update::{event_name}"),
            event_type = %event_name
        );
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => self.map_key_event(key),
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                Self::map_custom_message_event(&message, &payload)
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => Some(Event::PermissionResult {
                granted: matches!(status, PermissionStatus::Granted),
            }),
            zellij_tile::prelude::Event::Timer(_) => Some(Event::Tick),
            zellij_tile::prelude::Event::RunCommandResult(exit_code, _stdout, stderr, context) => {
                Self::map_command_result_event(exit_code, &stderr, &context)
            }
            _ => None,
        };

        our_event.is_some_and(|event| self.dispatch(event))
    }

    fn render(&mut self, rows: usize, cols: usize) {
        zcontacts::ui::render(&self.app, rows, cols);
    }
}

impl State {
    /// Reads the persisted flags; a missing or unreadable file means
    /// defaults.
    fn load_preferences() -> Preferences {
        match JsonPreferenceStore::in_dir(&get_data_dir()) {
            Ok(store) => store.load(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read preferences, using defaults");
                Preferences::default()
            }
        }
    }

    /// Runs `event` through the handler and executes the resulting actions.
    /// Follow-up events from failed actions are handled in turn.
    fn dispatch(&mut self, event: Event) -> bool {
        let mut pending = vec![event];
        let mut should_render = false;

        while let Some(event) = pending.pop() {
            match handle_event(&mut self.app, &event, Instant::now()) {
                Ok((render, actions)) => {
                    tracing::debug!(action_count = actions.len(), should_render = render, "event handled");
                    should_render |= render;
                    pending.extend(actions.iter().filter_map(|action| self.execute_action(action)));
                }
                Err(e) => tracing::warn!(error = %e, "error handling event"),
            }
        }
        should_render
    }

    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::debug!(bare_key = ?key.bare_key, "key event");

        if self.app.dialog.is_some() {
            return match key.bare_key {
                BareKey::Enter => Some(Event::ConfirmDialog),
                BareKey::Esc => Some(Event::DismissDialog),
                BareKey::Char('q') => Some(Event::CloseFocus),
                _ => None,
            };
        }

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        match self.app.input_mode {
            InputMode::Normal => Self::map_normal_key(&key.bare_key),
            InputMode::Search(SearchFocus::Typing) => Some(match key.bare_key {
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Esc => Event::ExitSearch,
                BareKey::Enter => Event::FocusResults,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            }),
            InputMode::Search(SearchFocus::Navigating) => Some(match key.bare_key {
                BareKey::Down | BareKey::Char('j') => Event::KeyDown,
                BareKey::Up | BareKey::Char('k') => Event::KeyUp,
                BareKey::Enter | BareKey::Char(' ') => Event::ToggleExpand,
                BareKey::Char('c') => Event::Call,
                BareKey::Char('m') => Event::Message,
                BareKey::Char('/') | BareKey::Backspace => Event::FocusSearchBar,
                BareKey::Esc => Event::ExitSearch,
                _ => return None,
            }),
        }
    }

    fn map_normal_key(bare_key: &BareKey) -> Option<Event> {
        Some(match bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Enter | BareKey::Char(' ') => Event::ToggleExpand,
            BareKey::Char('c') => Event::Call,
            BareKey::Char('m') => Event::Message,
            BareKey::Char('r') => Event::Refresh,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Esc => Event::Escape,
            _ => return None,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    /// Only results of our own dial and message commands are of interest.
    fn map_command_result_event(
        exit_code: Option<i32>,
        stderr: &[u8],
        context: &BTreeMap<String, String>,
    ) -> Option<Event> {
        let action = context.get(COMMAND_CONTEXT_KEY)?;
        tracing::debug!(action = %action, exit_code = ?exit_code, "contact action finished");

        if exit_code == Some(0) {
            return None;
        }
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        let error = if stderr.is_empty() {
            exit_code.map_or_else(|| format!("{action} command did not run"), |code| format!("{action} exited with {code}"))
        } else {
            stderr
        };
        Some(Event::LaunchFailed { error })
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
        }
    }

    fn run_contact_command(action: &str, template: &str, number: &str) -> Option<Event> {
        let Some(args) = command_line(template, number) else {
            return Some(Event::LaunchFailed { error: format!("no {action} command configured") });
        };
        tracing::debug!(action = %action, program = %args[0], "running contact command");

        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let context = BTreeMap::from([(COMMAND_CONTEXT_KEY.to_string(), action.to_string())]);
        run_command(&argv, context);
        None
    }

    /// Executes one action. Returns a follow-up event when the action could
    /// not be started.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&self, action: &Action) -> Option<Event> {
        match action {
            Action::CloseFocus => {
                hide_self();
                None
            }
            Action::PostToWorker(message) => {
                Self::post_worker_message(message);
                None
            }
            Action::RequestPermission => {
                request_permission(&[
                    PermissionType::ReadApplicationState,
                    PermissionType::RunCommands,
                    PermissionType::FullHdAccess,
                ]);
                None
            }
            Action::Dial { number } => Self::run_contact_command("dial", &self.dial_command, number),
            Action::Message { number } => Self::run_contact_command("message", &self.message_command, number),
            Action::ScheduleTick { after } => {
                set_timeout(after.as_secs_f64());
                None
            }
        }
    }
}
