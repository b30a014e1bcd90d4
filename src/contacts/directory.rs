//! Contact repository over a directory of vCard files.

use super::photo::lookup_photo;
use super::repository::ContactRepository;
use super::vcard::{self, unescape_text, Card};
use crate::app::filter;
use crate::domain::error::{ContactsError, Result};
use crate::domain::{ContactId, ContactRecord};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Reads every `*.vcf` file directly inside `root`.
///
/// Files are visited in file-name order and cards keep their order within a
/// file, so repeated fetches of an unchanged directory return the same list.
/// Subdirectories are not searched.
///
/// # Examples
///
/// ```no_run
/// use zcontacts::contacts::{ContactRepository, VcardDirectory};
///
/// let contacts = VcardDirectory::new("/host/.contacts").fetch_all(Some("ann"))?;
/// # Ok::<(), zcontacts::ContactsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VcardDirectory {
    root: PathBuf,
}

impl VcardDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn vcard_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            ContactsError::Directory(format!("{}: {e}", self.root.display()))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|path| path.is_file() && has_vcf_extension(path))
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_file(path: &Path) -> Option<Vec<Card>> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable vCard file");
                return None;
            }
        };
        match vcard::parse(&text) {
            Ok(cards) => Some(cards),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping malformed vCard file");
                None
            }
        }
    }
}

impl ContactRepository for VcardDirectory {
    fn fetch_all(&self, query: Option<&str>) -> Result<Vec<ContactRecord>> {
        let _span = tracing::debug_span!("vcard_fetch_all",
            root = %self.root.display(),
            has_query = query.is_some_and(|q| !q.trim().is_empty())
        ).entered();

        let files = self.vcard_files()?;
        let mut contacts = Vec::new();
        let mut seen = HashSet::new();

        for path in &files {
            let Some(cards) = Self::read_file(path) else {
                continue;
            };
            let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

            for (index, card) in cards.iter().enumerate() {
                let id = unique_id(&mut seen, card.uid(), &file_name, index);
                let record = ContactRecord::new(id, card.display_name(), lookup_phone(card), lookup_photo(card));

                if query.map_or(true, |q| filter::matches(&record, q)) {
                    contacts.push(record);
                }
            }
        }

        tracing::debug!(files = files.len(), contacts = contacts.len(), "contacts fetched");
        Ok(contacts)
    }
}

/// The card's `UID`, or its position when the card has none or the `UID`
/// was already taken by an earlier card. Ids are assigned before any query
/// is applied, so they do not depend on the query.
fn unique_id(seen: &mut HashSet<ContactId>, uid: Option<String>, file_name: &str, index: usize) -> ContactId {
    if let Some(uid) = uid {
        let id = ContactId::new(uid);
        if seen.insert(id.clone()) {
            return id;
        }
        tracing::debug!(uid = %id, file = %file_name, index, "duplicate UID, using position");
    }

    let positional = ContactId::positional(file_name, index);
    let mut id = positional.clone();
    let mut suffix = 1;
    while !seen.insert(id.clone()) {
        id = ContactId::new(format!("{positional}#{suffix}"));
        suffix += 1;
    }
    id
}

fn has_vcf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("vcf"))
}

/// First `TEL` value of `card`, or an empty string.
///
/// A `tel:` URI scheme is removed so the number can be handed to any dialer.
#[must_use]
pub fn lookup_phone(card: &Card) -> String {
    let Some(tel) = card.first("TEL") else {
        return String::new();
    };
    let value = unescape_text(tel.value.trim());
    let number = match value.get(..4) {
        Some(scheme) if scheme.eq_ignore_ascii_case("tel:") => &value[4..],
        _ => value.as_str(),
    };
    number.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Photo;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = VcardDirectory::new(dir.path().join("nope"));
        assert!(matches!(repo.fetch_all(None), Err(ContactsError::Directory(_))));
    }

    #[test]
    fn empty_directory_has_no_contacts() {
        let dir = TempDir::new().unwrap();
        assert!(VcardDirectory::new(dir.path()).fetch_all(None).unwrap().is_empty());
    }

    #[test]
    fn contact_without_phone_or_photo_gets_defaults() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.vcf", "BEGIN:VCARD\nFN:No Number\nEND:VCARD\n");

        let contacts = VcardDirectory::new(dir.path()).fetch_all(None).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "No Number");
        assert_eq!(contacts[0].phone_number, "");
        assert_eq!(contacts[0].photo, Photo::Default);
        assert_eq!(contacts[0].id, ContactId::new("a.vcf#0"));
    }

    #[test]
    fn files_are_read_in_name_order_and_skip_other_extensions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.vcf", "BEGIN:VCARD\nUID:bob\nFN:Bob\nTEL:2\nEND:VCARD\n");
        write(&dir, "a.VCF", "BEGIN:VCARD\nFN:Ann\nTEL:1\nEND:VCARD\nBEGIN:VCARD\nFN:Amy\nEND:VCARD\n");
        write(&dir, "notes.txt", "BEGIN:VCARD\nFN:Ignored\nEND:VCARD\n");

        let names: Vec<String> = VcardDirectory::new(dir.path())
            .fetch_all(None)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ann", "Amy", "Bob"]);
    }

    #[test]
    fn malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "bad.vcf", "this is not a vcard");
        write(&dir, "good.vcf", "BEGIN:VCARD\nFN:Good\nEND:VCARD\n");

        let contacts = VcardDirectory::new(dir.path()).fetch_all(None).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name, "Good");
    }

    #[test]
    fn query_is_applied_to_name_and_number() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "all.vcf",
            "BEGIN:VCARD\nFN:Ann\nTEL:123\nEND:VCARD\nBEGIN:VCARD\nFN:Bob\nTEL:456\nEND:VCARD\n",
        );
        let repo = VcardDirectory::new(dir.path());

        assert_eq!(repo.fetch_all(Some("AN")).unwrap().len(), 1);
        assert_eq!(repo.fetch_all(Some("45")).unwrap()[0].name, "Bob");
        assert_eq!(repo.fetch_all(Some("  ")).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_uids_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.vcf", "BEGIN:VCARD\nUID:same\nFN:Ann\nTEL:1\nEND:VCARD\n");
        write(&dir, "b.vcf", "BEGIN:VCARD\nUID:same\nFN:Anna\nTEL:2\nEND:VCARD\n");
        write(&dir, "c.vcf", "BEGIN:VCARD\nUID:b.vcf#0\nFN:Odd\nEND:VCARD\n");

        let ids: Vec<String> = VcardDirectory::new(dir.path())
            .fetch_all(None)
            .unwrap()
            .into_iter()
            .map(|c| c.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["same", "b.vcf#0", "c.vcf#0"]);
    }

    #[test]
    fn ids_do_not_depend_on_query() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.vcf", "BEGIN:VCARD\nUID:same\nFN:Bob\nEND:VCARD\n");
        write(&dir, "b.vcf", "BEGIN:VCARD\nUID:same\nFN:Anna\nEND:VCARD\n");

        let filtered = VcardDirectory::new(dir.path()).fetch_all(Some("anna")).unwrap();
        assert_eq!(filtered[0].id, ContactId::new("b.vcf#0"));
    }

    #[test]
    fn phone_lookup_strips_tel_scheme() {
        let card = &vcard::parse("BEGIN:VCARD\nTEL;VALUE=uri:tel:+1-555\nTEL:999\nEND:VCARD").unwrap()[0];
        assert_eq!(lookup_phone(card), "+1-555");
    }
}
