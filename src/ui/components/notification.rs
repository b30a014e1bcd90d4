//! Transient notification, drawn over the bottom border.

use crate::ui::helpers::{char_width, position_cursor, truncate_chars};
use crate::ui::theme::Theme;

pub fn render_notification(out: &mut String, row: usize, message: &str, theme: &Theme, cols: usize) {
    let text = truncate_chars(&format!(" {message} "), cols.saturating_sub(4));
    let start = cols.saturating_sub(char_width(&text)) / 2 + 1;

    out.push_str(&position_cursor(row, start));
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.notification_fg));
    out.push_str(&Theme::bg(&theme.colors.notification_bg));
    out.push_str(&text);
    out.push_str(Theme::reset());
}
