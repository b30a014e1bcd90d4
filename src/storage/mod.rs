//! Storage layer for plugin preferences.
//!
//! # Modules
//!
//! - `backend`: [`PreferenceStore`] trait
//! - `json`: JSON file implementation with atomic writes
//! - `models`: Persisted record types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::PreferenceStore;
pub use json::{JsonPreferenceStore, PREFERENCES_FILE};
pub use models::Preferences;
