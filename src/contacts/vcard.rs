//! Minimal vCard reader.
//!
//! Handles the subset needed to list contacts: line unfolding, property
//! groups, parameters (quoted or bare), and text escapes. Versions 2.1, 3.0
//! and 4.0 share this syntax. Properties that fail to parse are skipped;
//! only input with no card structure at all is an error.

use crate::domain::error::{ContactsError, Result};

/// One property line, e.g. `TEL;TYPE=cell:+1 555 0100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Upper-cased property name with any group prefix removed.
    pub name: String,
    /// Parameters in source order. Keys are upper-cased; bare vCard 2.1
    /// parameters such as `CELL` are stored as `("TYPE", "CELL")`.
    pub params: Vec<(String, String)>,
    /// Raw value, not unescaped.
    pub value: String,
}

impl Property {
    /// Returns the first value of parameter `key` (case-insensitive).
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub properties: Vec<Property>,
}

impl Card {
    /// First property named `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }

    #[must_use]
    pub fn uid(&self) -> Option<String> {
        self.first("UID")
            .map(|p| unescape_text(&p.value).trim().to_string())
            .filter(|uid| !uid.is_empty())
    }

    /// Display name: `FN`, falling back to a name assembled from `N`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(formatted) = self.first("FN") {
            let name = unescape_text(&formatted.value).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
        self.first("N").map(|n| structured_name(&n.value)).unwrap_or_default()
    }
}

/// Splits `input` into cards.
///
/// # Errors
///
/// Returns [`ContactsError::Parse`] when the input has content but no
/// `BEGIN:VCARD` line.
pub fn parse(input: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut current: Option<Card> = None;
    let mut saw_content = false;

    for line in unfold(input) {
        if line.trim().is_empty() {
            continue;
        }
        saw_content = true;

        if line.eq_ignore_ascii_case("BEGIN:VCARD") {
            if current.is_some() {
                tracing::debug!("nested BEGIN:VCARD, restarting card");
            }
            current = Some(Card::default());
            continue;
        }
        if line.eq_ignore_ascii_case("END:VCARD") {
            if let Some(card) = current.take() {
                cards.push(card);
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };
        match parse_property(&line) {
            Some(property) => card.properties.push(property),
            None => tracing::debug!(line = %line, "skipping malformed vCard line"),
        }
    }

    // Tolerate a missing END:VCARD at end of file.
    if let Some(card) = current.take() {
        cards.push(card);
    }

    if saw_content && cards.is_empty() {
        return Err(ContactsError::Parse("no BEGIN:VCARD found".to_string()));
    }
    Ok(cards)
}

/// Joins folded lines: a line starting with a space or tab continues the
/// previous one with that single whitespace character removed.
fn unfold(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in input.lines() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match raw.chars().next() {
            Some(' ' | '\t') if !lines.is_empty() => {
                if let Some(last) = lines.last_mut() {
                    last.push_str(&raw[1..]);
                }
            }
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

fn parse_property(line: &str) -> Option<Property> {
    let colon = find_unquoted(line, ':')?;
    let (head, value) = (&line[..colon], &line[colon + 1..]);

    let mut segments = split_unquoted(head, ';').into_iter();
    let raw_name = segments.next()?.trim();
    let name = raw_name.rsplit('.').next().unwrap_or(raw_name).to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    let params = segments
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, val)) => (key.trim().to_ascii_uppercase(), val.trim_matches('"').to_string()),
            None => ("TYPE".to_string(), segment.trim().to_string()),
        })
        .collect();

    Some(Property { name, params, value: value.to_string() })
}

fn find_unquoted(s: &str, needle: char) -> Option<usize> {
    let mut quoted = false;
    for (i, ch) in s.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            c if c == needle && !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(i) = find_unquoted(rest, sep) {
        parts.push(&rest[..i]);
        rest = &rest[i + sep.len_utf8()..];
    }
    parts.push(rest);
    parts
}

/// Resolves `\n`, `\,`, `\;` and `\\` escapes.
#[must_use]
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// `N:Family;Given;Additional;Prefix;Suffix` → `"Prefix Given Additional Family Suffix"`.
fn structured_name(value: &str) -> String {
    let parts: Vec<String> = split_unescaped_semicolons(value)
        .iter()
        .map(|p| unescape_text(p).trim().to_string())
        .collect();
    let get = |i: usize| parts.get(i).map_or("", String::as_str);

    [get(3), get(1), get(2), get(0), get(4)]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_unescaped_semicolons(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, ch) in value.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            ';' if !escaped => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => escaped = false,
        }
    }
    parts.push(&value[start..]);
    parts
}
