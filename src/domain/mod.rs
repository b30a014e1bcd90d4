//! Domain layer for the zcontacts plugin.
//!
//! Core types that do not depend on Zellij or on the contact source format.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`contact`]: Contact record, identifier and photo model
//!
//! # Examples
//!
//! ```
//! use zcontacts::domain::{ContactId, ContactRecord, Photo};
//!
//! let ann = ContactRecord::new(ContactId::new("ann"), "Ann", "123", Photo::Default);
//! assert!(ann.photo.is_default());
//! ```

pub mod contact;
pub mod error;

pub use contact::{ContactId, ContactRecord, EmbeddedPhoto, Photo};
pub use error::{ContactsError, Result};
