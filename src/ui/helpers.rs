//! Shared rendering utilities.
//!
//! Components append to a `String` frame buffer rather than printing, so a
//! whole frame is written to stdout at once and can be inspected in tests.
//! All widths and ranges here are in characters, never bytes.

use crate::app::filter::fold_case;
use crate::ui::theme::Theme;

/// Escape sequence moving the cursor to `row`, `col` (both 1-indexed).
#[must_use]
pub fn position_cursor(row: usize, col: usize) -> String {
    format!("\u{1b}[{row};{col}H")
}

/// Number of characters in `text`.
#[must_use]
pub fn char_width(text: &str) -> usize {
    text.chars().count()
}

/// Shortens `text` to at most `max` characters, ending in `...` when cut.
///
/// ```
/// use zcontacts::ui::helpers::truncate_chars;
///
/// assert_eq!(truncate_chars("Ann", 10), "Ann");
/// assert_eq!(truncate_chars("Bartholomew", 8), "Barth...");
/// ```
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    if char_width(text) <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut truncated: String = text.chars().take(max - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Non-overlapping, case-insensitive occurrences of `query` in `text`.
///
/// Ranges are `(start, end)` character indices, end exclusive. An empty
/// query matches nothing.
///
/// ```
/// use zcontacts::ui::helpers::match_ranges;
///
/// assert_eq!(match_ranges("Anna Annabel", "ann"), vec![(0, 3), (5, 8)]);
/// assert!(match_ranges("Bob", "").is_empty());
/// ```
#[must_use]
pub fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let query: Vec<char> = fold_case(query).chars().collect();
    if query.is_empty() {
        return vec![];
    }

    // Folded characters paired with the index of the character they came from.
    let folded: Vec<(usize, char)> = text
        .chars()
        .enumerate()
        .flat_map(|(index, c)| c.to_lowercase().map(move |lower| (index, lower)))
        .collect();

    let mut ranges: Vec<(usize, usize)> = vec![];
    let mut start = 0;
    while start + query.len() <= folded.len() {
        let window = &folded[start..start + query.len()];
        if window.iter().map(|(_, c)| c).eq(query.iter()) {
            let from = window[0].0;
            let to = window[window.len() - 1].0 + 1;
            match ranges.last_mut() {
                // A match ending inside a multi-character fold shares its source character.
                Some(last) if last.1 > from => last.1 = last.1.max(to),
                _ => ranges.push((from, to)),
            }
            start += query.len();
        } else {
            start += 1;
        }
    }
    ranges
}

/// Appends `text` with `ranges` highlighted.
///
/// After each highlight the `restore` sequence is re-applied so the rest of
/// the row keeps its colors. Selected rows are drawn without highlights.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
    restore: &str,
) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        out.extend(&chars[current_pos..start]);

        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(restore);

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}

/// Appends `text` centered in `cols` columns, padded on both sides.
pub fn push_centered(out: &mut String, text: &str, cols: usize) {
    let text = truncate_chars(text, cols);
    let len = char_width(&text);
    let padding = cols.saturating_sub(len) / 2;

    out.push_str(&" ".repeat(padding));
    out.push_str(&text);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + len)));
}

/// Removes ANSI escape sequences. Used by tests to inspect frames.
#[cfg(test)]
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}
