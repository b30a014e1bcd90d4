//! Empty state component renderer.
//!
//! Shown in place of the table while contacts load, when the directory has
//! none, when a search matches nothing, or when permission was refused.

use crate::ui::helpers::{position_cursor, push_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the two-line centered message at `row` and `row + 1`.
pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    out.push_str(&position_cursor(row, 1));
    out.push_str(&Theme::fg(&theme.colors.empty_state_fg));
    push_centered(out, &empty.message, cols);
    out.push_str(Theme::reset());

    out.push_str(&position_cursor(row + 1, 1));
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    push_centered(out, &empty.subtitle, cols);
    out.push_str(Theme::reset());

    row + 2
}
