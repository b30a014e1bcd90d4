//! Application state and view model computation.
//!
//! [`AppState`] is the single explicit state object of the plugin: the last
//! accepted fetch, the displayed (possibly filtered) rows with their
//! expansion, the search query and its debouncer, the permission flow, and
//! the current notification. The event handler is the only writer.
//!
//! # Example
//!
//! ```
//! use zcontacts::app::{AppState, Settings};
//! use zcontacts::storage::Preferences;
//! use zcontacts::ui::Theme;
//!
//! let state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.display_items.is_empty());
//! ```

use super::actions::Action;
use super::debounce::{Debouncer, DEFAULT_DELAY};
use super::diff::ListDiff;
use super::expansion::ExpandableList;
use super::filter;
use super::modes::{InputMode, SearchFocus, SearchSource};
use super::notification::{self, Notification};
use super::permission::PermissionDialog;
use crate::domain::ContactRecord;
use crate::infrastructure::display_path;
use crate::storage::Preferences;
use crate::ui::helpers::{match_ranges, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DialogInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel,
};
use crate::worker::WorkerMessage;
use std::time::{Duration, Instant};

/// Display width reserved for the name column.
const NAME_COLUMN_WIDTH: usize = 37;

/// Runtime settings derived from the plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Sandbox path of the vCard directory.
    pub contacts_dir: String,
    pub search_source: SearchSource,
    pub debounce_delay: Duration,
    pub notification_duration: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contacts_dir: "/host/.contacts".to_string(),
            search_source: SearchSource::Memory,
            debounce_delay: DEFAULT_DELAY,
            notification_duration: notification::DEFAULT_DURATION,
        }
    }
}

/// Whether the plugin may read contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// No answer from Zellij yet.
    Unknown,
    Granted,
    Denied,
}

/// Bookkeeping for worker fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchState {
    /// Generation of the most recently issued request. Responses carrying
    /// any other generation are stale.
    pub generation: u64,
    pub in_flight: bool,
    /// At least one fetch has completed.
    pub loaded: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Records of the last accepted fetch, unfiltered for the in-memory
    /// search source.
    pub contacts: Vec<ContactRecord>,

    /// Displayed rows and the expanded row.
    pub list: ExpandableList,

    /// Cursor position within `list`.
    pub selected_index: usize,

    pub input_mode: InputMode,

    /// Query as typed.
    pub search_query: String,

    /// Query the displayed rows were last filtered with. Lags
    /// `search_query` by the debounce delay.
    pub applied_query: String,

    pub debouncer: Debouncer<String>,
    pub fetch: FetchState,

    pub permission: PermissionState,

    /// Persisted "already asked" flag.
    pub permission_requested: bool,

    /// Set while the first-ever permission request awaits its answer.
    pub first_request_pending: bool,

    pub dialog: Option<PermissionDialog>,
    pub notification: Option<Notification>,

    pub settings: Settings,
    pub theme: Theme,
}

impl AppState {
    #[must_use]
    pub fn new(settings: Settings, preferences: &Preferences, theme: Theme) -> Self {
        Self {
            contacts: vec![],
            list: ExpandableList::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            applied_query: String::new(),
            debouncer: Debouncer::new(settings.debounce_delay),
            fetch: FetchState::default(),
            permission: PermissionState::Unknown,
            permission_requested: preferences.permission_requested,
            first_request_pending: false,
            dialog: None,
            notification: None,
            settings,
            theme,
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.list.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.list.len();
    }

    pub fn move_selection_up(&mut self) {
        if self.list.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.list.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&ContactRecord> {
        self.list.get(self.selected_index)
    }

    /// Issues a new fetch and returns the worker request.
    ///
    /// Bumps the generation, so any response still in flight becomes stale.
    pub fn begin_fetch(&mut self, query: Option<String>) -> Action {
        self.fetch.generation += 1;
        self.fetch.in_flight = true;
        tracing::debug!(generation = self.fetch.generation, query = ?query, "requesting contacts");

        Action::PostToWorker(WorkerMessage::fetch_contacts(
            self.fetch.generation,
            self.settings.contacts_dir.clone(),
            query,
        ))
    }

    /// Adopts the records of an accepted fetch.
    ///
    /// For the in-memory source the applied query is re-run over the new
    /// records; the directory source already applied it. Expansion is lost
    /// either way.
    pub fn accept_fetch(&mut self, contacts: Vec<ContactRecord>) -> ListDiff {
        self.fetch.in_flight = false;
        self.fetch.loaded = true;

        let rows = match self.settings.search_source {
            SearchSource::Memory => filter::filter(&contacts, &self.applied_query),
            SearchSource::Directory => contacts.clone(),
        };
        self.contacts = contacts;

        let diff = self.list.on_list_replaced(rows);
        self.clamp_selection();
        diff
    }

    /// Makes `query` the applied query.
    ///
    /// Returns the worker request when the query has to be evaluated by the
    /// directory, or `None` when the rows were filtered in place.
    pub fn apply_query(&mut self, query: String) -> Option<Action> {
        let _span = tracing::debug_span!("apply_query",
            query_len = query.len(),
            source = ?self.settings.search_source
        ).entered();

        self.applied_query = query;
        match self.settings.search_source {
            SearchSource::Memory => {
                let rows = filter::filter(&self.contacts, &self.applied_query);
                let diff = self.list.on_list_filtered(rows);
                self.clamp_selection();
                tracing::debug!(
                    shown = self.list.len(),
                    removed = diff.removed.len(),
                    inserted = diff.inserted.len(),
                    "filter applied"
                );
                None
            }
            SearchSource::Directory => {
                let query = Some(self.applied_query.clone()).filter(|q| !q.trim().is_empty());
                Some(self.begin_fetch(query))
            }
        }
    }

    /// Replaces the current notification and returns the timer that will
    /// expire it.
    pub fn notify(&mut self, message: impl Into<String>, now: Instant) -> Action {
        let duration = self.settings.notification_duration;
        let notification = Notification::new(message, now, duration);
        tracing::debug!(message = %notification.message, "showing notification");
        self.notification = Some(notification);
        Action::ScheduleTick { after: duration }
    }

    /// Drops the notification once it has expired. Returns `true` if one was
    /// removed.
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
            return true;
        }
        false
    }

    fn clamp_selection(&mut self) {
        if self.list.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.list.len() - 1);
        }
    }

    /// Builds the renderable view of the current state for a pane of
    /// `rows` x `cols` cells.
    ///
    /// The visible window is centered on the selection. An expanded row
    /// takes one extra line, which is reserved up front.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let mut vm = UIViewModel {
            display_items: vec![],
            selected_index: 0,
            header: self.compute_header(),
            footer: self.compute_footer(),
            empty_state: None,
            search_bar: self.compute_search_bar(),
            notification: self.notification.as_ref().map(|n| n.message.clone()),
            dialog: self.dialog.as_ref().map(|d| DialogInfo {
                title: d.title.clone(),
                message: d.message.clone(),
            }),
        };

        if self.list.is_empty() {
            vm.empty_state = Some(self.compute_empty_state());
            return vm;
        }

        let reserved = usize::from(self.list.expanded_position().is_some());
        let available_rows = self.calculate_available_rows(rows).saturating_sub(reserved).max(1);
        let total = self.list.len();

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(total);
        if visible_end - visible_start < available_rows && total >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let highlight_query = if matches!(self.input_mode, InputMode::Search(_)) {
            self.applied_query.trim()
        } else {
            ""
        };

        vm.display_items = self.list.rows()[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let record = row.record;
                let name = if record.name.is_empty() { "(no name)".to_string() } else { truncate_chars(&record.name, 35) };
                let phone = truncate_chars(&record.phone_number, cols.saturating_sub(NAME_COLUMN_WIDTH + 2));

                DisplayItem {
                    name_highlights: match_ranges(&name, highlight_query),
                    phone_highlights: match_ranges(&phone, highlight_query),
                    name,
                    phone,
                    photo_label: record.photo.label(),
                    has_number: record.has_dialable_number(),
                    is_selected: visible_start + offset == self.selected_index,
                    is_expanded: row.is_expanded,
                }
            })
            .collect();
        vm.selected_index = self.selected_index.saturating_sub(visible_start);
        vm
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = if self.fetch.in_flight && self.fetch.loaded {
            format!(" Contacts ({}) - refreshing ", self.list.len())
        } else {
            format!(" Contacts ({}) ", self.list.len())
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.dialog.is_some() {
            "Enter: grant permission  Esc: dismiss  q: quit"
        } else {
            match (self.input_mode, self.list.expanded_position().is_some()) {
                (InputMode::Search(SearchFocus::Typing), _) => {
                    "ESC: exit search  Enter: results  Ctrl+n/p: navigate  Type to filter"
                }
                (InputMode::Search(SearchFocus::Navigating), _) => {
                    "ESC: exit search  /: edit query  j/k: navigate  Enter: expand  c: call  m: message"
                }
                (InputMode::Normal, true) => {
                    "j/k: navigate  Enter: collapse  c: call  m: message  /: search  q: quit"
                }
                (InputMode::Normal, false) => {
                    "j/k or Ctrl+n/p: navigate  Enter: expand  /: search  r: refresh  q: quit"
                }
            }
        };
        FooterInfo { keybindings: keybindings.to_string() }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        matches!(self.input_mode, InputMode::Search(_)).then(|| SearchBarInfo {
            query: self.search_query.clone(),
            is_typing: self.input_mode == InputMode::Search(SearchFocus::Typing),
        })
    }

    fn compute_empty_state(&self) -> EmptyState {
        let dir = display_path(&self.settings.contacts_dir);

        let (message, subtitle) = if self.permission == PermissionState::Denied {
            (
                "Contacts permission not granted".to_string(),
                "Press r to ask again".to_string(),
            )
        } else if !self.fetch.loaded {
            ("Loading contacts...".to_string(), dir)
        } else if self.contacts.is_empty() {
            ("No contacts found".to_string(), format!("Add .vcf files to {dir}"))
        } else {
            (
                format!("No contacts match \"{}\"", self.applied_query.trim()),
                "Press Esc to clear the search".to_string(),
            )
        };
        EmptyState { message, subtitle }
    }

    /// Rows left for the list after the blank top line, header, borders,
    /// table header, footer, and the search bar when shown.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(7),
            InputMode::Search(_) => total_rows.saturating_sub(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactId, Photo};

    fn contact(id: &str, name: &str, phone: &str) -> ContactRecord {
        ContactRecord::new(ContactId::new(id), name, phone, Photo::Default)
    }

    fn loaded_state(contacts: Vec<ContactRecord>) -> AppState {
        let mut state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
        state.permission = PermissionState::Granted;
        state.begin_fetch(None);
        state.accept_fetch(contacts);
        state
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut state = loaded_state(vec![contact("a", "Ann", "1"), contact("b", "Bob", "2")]);
        state.move_selection_up();
        assert_eq!(state.selected_index, 1);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn begin_fetch_increments_generation() {
        let mut state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
        state.begin_fetch(None);
        let action = state.begin_fetch(Some("a".to_string()));
        assert_eq!(state.fetch.generation, 2);
        assert!(matches!(
            action,
            Action::PostToWorker(WorkerMessage::FetchContacts { generation: 2, .. })
        ));
    }

    #[test]
    fn memory_query_filters_in_place_and_clamps_selection() {
        let mut state = loaded_state(vec![
            contact("a", "Ann", "1"),
            contact("b", "Bob", "2"),
            contact("c", "Cat", "3"),
        ]);
        state.selected_index = 2;

        assert_eq!(state.apply_query("ann".to_string()), None);
        assert_eq!(state.list.len(), 1);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn directory_query_issues_fetch() {
        let settings = Settings { search_source: SearchSource::Directory, ..Settings::default() };
        let mut state = AppState::new(settings, &Preferences::default(), Theme::default());

        let action = state.apply_query("bo".to_string());
        assert!(matches!(
            action,
            Some(Action::PostToWorker(WorkerMessage::FetchContacts { query: Some(ref q), .. })) if q == "bo"
        ));
    }

    #[test]
    fn refetch_reapplies_memory_query() {
        let mut state = loaded_state(vec![contact("a", "Ann", "1")]);
        state.apply_query("bob".to_string());
        assert!(state.list.is_empty());

        state.begin_fetch(None);
        state.accept_fetch(vec![contact("a", "Ann", "1"), contact("b", "Bob", "2")]);
        assert_eq!(state.list.len(), 1);
        assert_eq!(state.list.records()[0].name, "Bob");
    }

    #[test]
    fn empty_states_follow_progress() {
        let mut state = AppState::new(Settings::default(), &Preferences::default(), Theme::default());
        assert_eq!(state.compute_viewmodel(24, 80).empty_state.unwrap().message, "Loading contacts...");

        state.begin_fetch(None);
        state.accept_fetch(vec![]);
        let empty = state.compute_viewmodel(24, 80).empty_state.unwrap();
        assert_eq!(empty.message, "No contacts found");
        assert_eq!(empty.subtitle, "Add .vcf files to ~/.contacts");

        state.accept_fetch(vec![contact("a", "Ann", "1")]);
        state.apply_query("zzz".to_string());
        let empty = state.compute_viewmodel(24, 80).empty_state.unwrap();
        assert_eq!(empty.message, "No contacts match \"zzz\"");
    }

    #[test]
    fn viewmodel_marks_selected_and_expanded_rows() {
        let mut state = loaded_state(vec![contact("a", "Ann", "1"), contact("b", "", "")]);
        state.list.on_item_tapped(1);
        state.selected_index = 1;

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.display_items.len(), 2);
        assert!(vm.display_items[1].is_selected);
        assert!(vm.display_items[1].is_expanded);
        assert_eq!(vm.display_items[1].name, "(no name)");
        assert!(!vm.display_items[1].has_number);
        assert_eq!(vm.display_items[1].photo_label, "default photo");
    }

    #[test]
    fn window_follows_selection() {
        let contacts: Vec<_> = (0..50).map(|i| contact(&i.to_string(), &format!("C{i}"), "1")).collect();
        let mut state = loaded_state(contacts);
        state.selected_index = 40;

        let vm = state.compute_viewmodel(16, 80);
        assert_eq!(vm.display_items.len(), 9);
        assert!(vm.display_items[vm.selected_index].is_selected);
        assert_eq!(vm.display_items[vm.selected_index].name, "C40");
    }

    #[test]
    fn notification_expires_on_time() {
        let mut state = loaded_state(vec![]);
        let now = Instant::now();
        let action = state.notify("hello", now);
        assert_eq!(action, Action::ScheduleTick { after: notification::DEFAULT_DURATION });

        assert!(!state.expire_notification(now + Duration::from_millis(10)));
        assert!(state.expire_notification(now + notification::DEFAULT_DURATION));
        assert!(state.notification.is_none());
    }
}
