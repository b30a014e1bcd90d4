//! Contact sources.
//!
//! # Modules
//!
//! - `repository`: [`ContactRepository`] trait
//! - `directory`: vCard directory implementation
//! - `vcard`: vCard line parser
//! - `photo`: `PHOTO` property decoding

pub mod directory;
pub mod photo;
pub mod repository;
pub mod vcard;

pub use directory::VcardDirectory;
pub use repository::ContactRepository;
