//! Top-level rendering coordinator.
//!
//! Computes the view model from application state and writes the frame
//! produced by the components to stdout in one go.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI for a `rows` x `cols` pane to stdout.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    print!("{}", render_to_string(state, rows, cols));
}

/// Renders the plugin UI into a string of ANSI-styled output.
#[must_use]
pub fn render_to_string(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, &state.theme, cols, rows)
}
