//! Composable UI component renderers.
//!
//! Each component appends one part of the frame to a `String` and returns
//! the next free row where that matters.
//!
//! # Components
//!
//! - [`header`]: title bar with the contact count
//! - [`footer`]: keybinding hints
//! - [`search`]: search input box
//! - [`table`]: NAME and PHONE columns plus the expanded detail line
//! - [`empty`]: message shown in place of the table
//! - [`notification`]: transient message over the bottom border
//! - [`dialog`]: permission dialog over the list
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Table Headers]
//! [Table Rows / Empty State]
//! [Border with notification]
//! [Footer]
//! ```

mod dialog;
mod empty;
mod footer;
mod header;
mod notification;
mod search;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use dialog::render_dialog;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use notification::render_notification;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Horizontal separator line at `row`. Returns the next free row.
fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    out.push_str(&position_cursor(row, 1));
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders a complete frame for a `rows` x `cols` pane.
#[must_use]
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) -> String {
    let mut out = String::new();
    let mut current_row = 2;

    current_row = render_header(&mut out, current_row, &vm.header, theme, cols);
    current_row = render_border(&mut out, current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(&mut out, current_row, search, theme, cols);
    }
    let body_start = current_row;

    if let Some(empty) = &vm.empty_state {
        render_empty_state(&mut out, body_start + 2, empty, theme, cols);
    } else {
        current_row = render_table_headers(&mut out, current_row, theme);
        render_table_rows(&mut out, current_row, &vm.display_items, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);

    render_border(&mut out, border_row, &theme.colors.border, cols);
    if let Some(message) = &vm.notification {
        render_notification(&mut out, border_row, message, theme, cols);
    }
    render_footer(&mut out, footer_row, &vm.footer, theme, cols);

    if let Some(dialog) = &vm.dialog {
        render_dialog(&mut out, body_start, border_row.saturating_sub(1), dialog, theme, cols);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::helpers::strip_ansi;
    use crate::ui::viewmodel::{DialogInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo};

    fn item(name: &str, phone: &str) -> DisplayItem {
        DisplayItem {
            name: name.to_string(),
            phone: phone.to_string(),
            photo_label: "default photo".to_string(),
            has_number: !phone.is_empty(),
            is_selected: false,
            is_expanded: false,
            name_highlights: vec![],
            phone_highlights: vec![],
        }
    }

    fn viewmodel(items: Vec<DisplayItem>) -> UIViewModel {
        UIViewModel {
            display_items: items,
            selected_index: 0,
            header: HeaderInfo { title: " Contacts (2) ".to_string() },
            footer: FooterInfo { keybindings: "q: quit".to_string() },
            empty_state: None,
            search_bar: None,
            notification: None,
            dialog: None,
        }
    }

    #[test]
    fn frame_contains_columns_and_rows() {
        let vm = viewmodel(vec![item("Ann", "+1 555"), item("Bob", "")]);
        let frame = strip_ansi(&render_layout(&vm, &Theme::default(), 80, 24));

        assert!(frame.contains("Contacts (2)"));
        assert!(frame.contains("NAME"));
        assert!(frame.contains("PHONE"));
        assert!(frame.contains("Ann"));
        assert!(frame.contains("+1 555"));
        assert!(frame.contains("q: quit"));
        assert!(frame.contains("────"));
    }

    #[test]
    fn expanded_row_shows_actions_or_missing_number() {
        let mut with_number = item("Ann", "+1 555");
        with_number.is_expanded = true;
        with_number.photo_label = "png 48x48".to_string();
        let frame = strip_ansi(&render_layout(&viewmodel(vec![with_number]), &Theme::default(), 80, 24));
        assert!(frame.contains("photo: png 48x48"));
        assert!(frame.contains("[c] Call  [m] Message"));

        let mut without = item("Bob", "");
        without.is_expanded = true;
        let frame = strip_ansi(&render_layout(&viewmodel(vec![without]), &Theme::default(), 80, 24));
        assert!(frame.contains("no number"));
        assert!(!frame.contains("[c] Call"));
    }

    #[test]
    fn empty_state_replaces_table() {
        let mut vm = viewmodel(vec![]);
        vm.empty_state = Some(EmptyState {
            message: "No contacts found".to_string(),
            subtitle: "Add .vcf files to ~/.contacts".to_string(),
        });
        let frame = strip_ansi(&render_layout(&vm, &Theme::default(), 80, 24));

        assert!(frame.contains("No contacts found"));
        assert!(frame.contains("Add .vcf files to ~/.contacts"));
        assert!(!frame.contains("PHONE"));
    }

    #[test]
    fn overlays_are_drawn() {
        let mut vm = viewmodel(vec![item("Ann", "1")]);
        vm.search_bar = Some(SearchBarInfo { query: "an".to_string(), is_typing: true });
        vm.notification = Some("Invalid phone number".to_string());
        vm.dialog = Some(DialogInfo {
            title: "Permission Required".to_string(),
            message: "Press Enter to grant it.".to_string(),
        });
        let frame = strip_ansi(&render_layout(&vm, &Theme::default(), 80, 24));

        assert!(frame.contains("Search: an_"));
        assert!(frame.contains(" Invalid phone number "));
        assert!(frame.contains("Permission Required"));
        assert!(frame.contains("[Enter] Grant  [Esc] Dismiss"));
    }

    #[test]
    fn tiny_pane_does_not_panic() {
        let mut vm = viewmodel(vec![item("A very long contact name that will not fit", "123")]);
        vm.dialog = Some(DialogInfo { title: "T".to_string(), message: "m".to_string() });
        vm.notification = Some("n".to_string());
        let _ = render_layout(&vm, &Theme::default(), 3, 2);
    }
}
