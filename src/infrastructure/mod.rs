//! Sandbox filesystem and host command helpers.

pub mod command;
pub mod paths;

pub use command::command_line;
pub use paths::{display_path, expand_tilde, get_data_dir};
