//! Table component renderer.
//!
//! Contacts are drawn as NAME and PHONE columns. The expanded contact gets a
//! second, indented line describing its photo and the available actions.

use crate::ui::helpers::{self, char_width, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

/// Width of the NAME column including its gap.
const NAME_COLUMN: usize = 37;

pub fn render_table_headers(out: &mut String, row: usize, theme: &Theme) -> usize {
    out.push_str(&position_cursor(row, 1));
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    out.push_str(&format!("  {:<width$}PHONE", "NAME", width = NAME_COLUMN - 2));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders `items` from `row` on. Returns the next free row.
pub fn render_table_rows(out: &mut String, row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(out, current_row, item, theme, cols);
        if item.is_expanded {
            current_row = render_detail_line(out, current_row, item, theme, cols);
        }
    }
    current_row
}

/// One contact. Selection colors span the full width; match highlights
/// are only drawn on unselected rows.
fn render_table_row(out: &mut String, row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    out.push_str(&position_cursor(row, 1));

    let base = if item.is_selected {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };
    out.push_str(&base);

    let marker = if item.is_expanded { "▾ " } else { "  " };
    out.push_str(marker);
    helpers::render_highlighted_text(out, &item.name, &item.name_highlights, theme, item.is_selected, &base);

    let name_len = char_width(marker) + char_width(&item.name);
    out.push_str(&" ".repeat(NAME_COLUMN.saturating_sub(name_len).max(1)));

    let phone_base = if item.is_selected {
        base.clone()
    } else {
        Theme::fg(&theme.colors.text_dim)
    };
    out.push_str(&phone_base);
    helpers::render_highlighted_text(out, &item.phone, &item.phone_highlights, theme, item.is_selected, &phone_base);

    let line_len = NAME_COLUMN.max(name_len + 1) + char_width(&item.phone);
    out.push_str(&" ".repeat(cols.saturating_sub(line_len)));

    out.push_str(Theme::reset());
    row + 1
}

/// Detail line for the expanded contact:
///
/// ```text
///     photo: png 48x48   [c] Call  [m] Message
///     photo: default photo   no number
/// ```
fn render_detail_line(out: &mut String, row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    out.push_str(&position_cursor(row, 1));
    out.push_str(&Theme::fg(&theme.colors.expanded_fg));

    let photo = format!("    photo: {}   ", item.photo_label);
    out.push_str(&photo);

    let actions = if item.has_number {
        "[c] Call  [m] Message"
    } else {
        "no number"
    };
    if item.has_number {
        out.push_str(&Theme::fg(&theme.colors.action_fg));
    } else {
        out.push_str(Theme::dim());
    }
    out.push_str(actions);

    let line_len = char_width(&photo) + char_width(actions);
    out.push_str(&" ".repeat(cols.saturating_sub(line_len)));
    out.push_str(Theme::reset());
    row + 1
}
