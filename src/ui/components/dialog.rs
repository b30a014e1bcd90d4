//! Permission dialog drawn over the list area.
//!
//! ```text
//! ╭─ Permission Required ──────────────╮
//! │                                    │
//! │ zcontacts needs permission to read │
//! │ your contact directory ...         │
//! │                                    │
//! │      [Enter] Grant  [Esc] Dismiss  │
//! ╰────────────────────────────────────╯
//! ```

use crate::ui::helpers::{char_width, position_cursor, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DialogInfo;

const MAX_WIDTH: usize = 60;
const BUTTONS: &str = "[Enter] Grant  [Esc] Dismiss";

/// Renders `dialog` centered between `top` and `bottom` (inclusive rows).
pub fn render_dialog(out: &mut String, top: usize, bottom: usize, dialog: &DialogInfo, theme: &Theme, cols: usize) {
    let width = cols.saturating_sub(4).min(MAX_WIDTH);
    let inner = width.saturating_sub(4);
    if inner == 0 {
        return;
    }

    let available = bottom.saturating_sub(top) + 1;
    let mut lines = wrap_words(&dialog.message, inner);
    // Border, blank, message, blank, buttons, border.
    lines.truncate(available.saturating_sub(5).max(1));
    let height = lines.len() + 5;

    let left = cols.saturating_sub(width) / 2 + 1;
    let first_row = top + available.saturating_sub(height) / 2;
    let border = Theme::fg(&theme.colors.dialog_border);

    let title = truncate_chars(&format!(" {} ", dialog.title), inner);
    let mut row = first_row;
    out.push_str(&position_cursor(row, left));
    out.push_str(&border);
    out.push_str(&format!(
        "╭─{title}{}╮",
        "─".repeat(width.saturating_sub(3 + char_width(&title)))
    ));

    let mut body = vec![String::new()];
    body.extend(lines);
    body.push(String::new());
    body.push(format!("{BUTTONS:>inner$}"));

    for line in &body {
        row += 1;
        out.push_str(&position_cursor(row, left));
        out.push_str(&border);
        out.push('│');
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        out.push(' ');
        out.push_str(line);
        out.push_str(&" ".repeat(inner.saturating_sub(char_width(line)) + 1));
        out.push_str(&border);
        out.push('│');
    }

    row += 1;
    out.push_str(&position_cursor(row, left));
    out.push_str(&format!("╰{}╯", "─".repeat(width.saturating_sub(2))));
    out.push_str(Theme::reset());
}

/// Greedy word wrap to `width` characters. Words longer than a line are cut.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word = truncate_chars(word, width);
        if current.is_empty() {
            current = word;
        } else if char_width(&current) + 1 + char_width(&word) <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_words("press enter to grant access", 12),
            vec!["press enter", "to grant", "access"]
        );
    }

    #[test]
    fn long_words_are_cut() {
        assert_eq!(wrap_words("abcdefghijkl", 6), vec!["abc..."]);
    }
}
