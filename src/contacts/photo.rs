//! Embedded photo decoding.
//!
//! A `PHOTO` property may carry a `data:` URI, bare base64 (vCard 3.0
//! `ENCODING=b`), or a reference to a remote resource. Only the first two
//! are decoded; references count as no photo. Every failure resolves to
//! [`Photo::Default`] and is logged, so a broken photo never hides a contact.

use super::vcard::{Card, Property};
use crate::domain::{EmbeddedPhoto, Photo};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
enum PhotoError {
    #[error("invalid data URI: {0}")]
    DataUri(&'static str),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),
}

/// Resolves the photo of `card`.
///
/// The first `PHOTO` property that yields an image wins. A property that
/// fails to decode makes the whole lookup fall back to the default image.
pub fn lookup_photo(card: &Card) -> Photo {
    for property in card.all("PHOTO") {
        match decode_property(property) {
            Ok(Some(photo)) => return Photo::Embedded(photo),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "photo could not be decoded, using default");
                return Photo::Default;
            }
        }
    }
    Photo::Default
}

fn decode_property(property: &Property) -> Result<Option<EmbeddedPhoto>, PhotoError> {
    let value = property.value.trim();

    if property.param("VALUE").is_some_and(|v| v.eq_ignore_ascii_case("uri"))
        && strip_data_scheme(value).is_none()
    {
        return Ok(None);
    }
    if value.is_empty() || is_remote_reference(value) {
        return Ok(None);
    }

    let bytes = match strip_data_scheme(value) {
        Some(data_uri) => parse_data_uri(data_uri)?,
        None => decode_base64_blob(value)?,
    };
    if bytes.is_empty() {
        return Ok(None);
    }

    decode_image(bytes).map(Some)
}

/// The part after a `data:` scheme, matched case-insensitively.
fn strip_data_scheme(value: &str) -> Option<&str> {
    value
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &value[5..])
}

fn is_remote_reference(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn parse_data_uri(input: &str) -> Result<Vec<u8>, PhotoError> {
    let (meta, payload) = input
        .split_once(',')
        .ok_or(PhotoError::DataUri("missing payload"))?;

    if !meta.split(';').any(|segment| segment.eq_ignore_ascii_case("base64")) {
        return Err(PhotoError::DataUri("payload is not base64 encoded"));
    }
    decode_base64_blob(payload)
}

fn decode_base64_blob(value: &str) -> Result<Vec<u8>, PhotoError> {
    let filtered: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if filtered.is_empty() {
        return Ok(Vec::new());
    }
    Ok(BASE64_STANDARD.decode(filtered)?)
}

fn decode_image(bytes: Vec<u8>) -> Result<EmbeddedPhoto, PhotoError> {
    let format = image::guess_format(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format)?;

    Ok(EmbeddedPhoto {
        format: format!("{format:?}").to_ascii_lowercase(),
        width: decoded.width(),
        height: decoded.height(),
        bytes,
    })
}
