//! Search bar component renderer.

use crate::ui::helpers::{char_width, position_cursor, truncate_chars};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the 3-line search box starting at `row`.
///
/// ```text
/// [margin] ┌─────────────┐ [margin]
/// [margin] │ Search: ann_│ [margin]
/// [margin] └─────────────┘ [margin]
/// ```
///
/// A trailing `_` marks the query as editable. Returns `row + 3`.
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    out.push_str(&position_cursor(row, 1));
    out.push_str(&" ".repeat(SEARCH_BOX_MARGIN));
    out.push_str(&border);
    out.push_str(&format!("┌{}┐", "─".repeat(inner_width)));
    out.push_str(Theme::reset());

    let cursor = if search.is_typing { "_" } else { "" };
    let search_text = truncate_chars(&format!(" Search: {}{cursor}", search.query), inner_width);
    let padding = inner_width.saturating_sub(char_width(&search_text));

    out.push_str(&position_cursor(row + 1, 1));
    out.push_str(&" ".repeat(SEARCH_BOX_MARGIN));
    out.push_str(&border);
    out.push('│');
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    if !search.is_typing {
        out.push_str(Theme::dim());
    }
    out.push_str(&search_text);
    out.push_str(Theme::reset());
    out.push_str(&" ".repeat(padding));
    out.push_str(&border);
    out.push('│');
    out.push_str(Theme::reset());

    out.push_str(&position_cursor(row + 2, 1));
    out.push_str(&" ".repeat(SEARCH_BOX_MARGIN));
    out.push_str(&border);
    out.push_str(&format!("└{}┘", "─".repeat(inner_width)));
    out.push_str(Theme::reset());

    row + 3
}
