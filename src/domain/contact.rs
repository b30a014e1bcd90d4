//! Contact domain model.
//!
//! A [`ContactRecord`] is an immutable snapshot of one entry of the contact
//! directory, created fresh on every fetch. Expansion is UI state and lives
//! in [`crate::app::expansion`], not on the record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a contact within the contact directory.
///
/// Taken from the vCard `UID` when the card has one, otherwise derived from
/// the file name and the card's position inside that file. List diffing and
/// expansion tracking compare records by this identifier, never by a display
/// field such as the phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the fallback identifier for a card without a `UID`.
    ///
    /// ```
    /// use zcontacts::domain::ContactId;
    ///
    /// assert_eq!(ContactId::positional("family.vcf", 2).as_str(), "family.vcf#2");
    /// ```
    #[must_use]
    pub fn positional(file_name: &str, index: usize) -> Self {
        Self(format!("{file_name}#{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded photo embedded in a vCard.
///
/// Only photos that decode successfully are represented; anything else
/// becomes [`Photo::Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedPhoto {
    /// Image format name as reported by the decoder (e.g. `"png"`).
    pub format: String,
    pub width: u32,
    pub height: u32,
    /// Original encoded bytes, carried as base64 across the worker boundary.
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Photo attached to a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Photo {
    Embedded(EmbeddedPhoto),
    /// The fixed bundled default image, used when the contact has no photo
    /// or its photo cannot be decoded.
    Default,
}

impl Photo {
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Short label shown in the expanded row.
    ///
    /// ```
    /// use zcontacts::domain::Photo;
    ///
    /// assert_eq!(Photo::Default.label(), "default photo");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Embedded(photo) => format!("{} {}x{}", photo.format, photo.width, photo.height),
            Self::Default => "default photo".to_string(),
        }
    }
}

impl Default for Photo {
    fn default() -> Self {
        Self::Default
    }
}

/// Immutable snapshot of one contact.
///
/// `name` and `phone_number` are never absent; missing values are empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: ContactId,
    pub name: String,
    pub phone_number: String,
    pub photo: Photo,
}

impl ContactRecord {
    pub fn new(
        id: ContactId,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        photo: Photo,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number: phone_number.into(),
            photo,
        }
    }

    /// Returns `true` when the phone number can be handed to a dialer.
    ///
    /// ```
    /// use zcontacts::domain::{ContactId, ContactRecord, Photo};
    ///
    /// let blank = ContactRecord::new(ContactId::new("x"), "X", "  ", Photo::Default);
    /// assert!(!blank.has_dialable_number());
    /// ```
    #[must_use]
    pub fn has_dialable_number(&self) -> bool {
        !self.phone_number.trim().is_empty()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
