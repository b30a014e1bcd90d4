//! Minimal change hints between two displayed lists.
//!
//! Rows are matched by [`ContactId`]. Rows that appear in both lists and keep
//! their relative order form the longest increasing run of new positions;
//! everything else is reported as a removal from the old list or an insertion
//! into the new one. The renderer redraws the whole frame regardless, so
//! these hints are used to skip renders that would change nothing and to log
//! what a refresh actually did.

use crate::domain::{ContactId, ContactRecord};
use std::collections::HashMap;

/// Change hints produced by [`diff_rows`].
///
/// `removed` holds positions in the old list, `inserted` and `changed`
/// positions in the new list. All three are ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiff {
    pub removed: Vec<usize>,
    pub inserted: Vec<usize>,
    pub changed: Vec<usize>,
}

impl ListDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && self.changed.is_empty()
    }
}

/// Computes change hints turning `old` into `new`.
///
/// ```
/// use zcontacts::app::diff::diff_rows;
/// use zcontacts::domain::{ContactId, ContactRecord, Photo};
///
/// let ann = ContactRecord::new(ContactId::new("a"), "Ann", "1", Photo::Default);
/// let bob = ContactRecord::new(ContactId::new("b"), "Bob", "2", Photo::Default);
///
/// let diff = diff_rows(&[ann.clone(), bob.clone()], &[bob]);
/// assert_eq!(diff.removed, vec![0]);
/// assert!(diff.inserted.is_empty());
/// ```
#[must_use]
pub fn diff_rows(old: &[ContactRecord], new: &[ContactRecord]) -> ListDiff {
    let new_positions: HashMap<&ContactId, usize> =
        new.iter().enumerate().map(|(i, r)| (&r.id, i)).collect();

    // Old rows that still exist, in old order, paired with their new position.
    let surviving: Vec<(usize, usize)> = old
        .iter()
        .enumerate()
        .filter_map(|(old_idx, r)| new_positions.get(&r.id).map(|&new_idx| (old_idx, new_idx)))
        .collect();

    let kept_run = longest_increasing_run(&surviving.iter().map(|&(_, n)| n).collect::<Vec<_>>());

    let mut kept_old = vec![false; old.len()];
    let mut kept_new = vec![false; new.len()];
    let mut changed = Vec::new();
    for &k in &kept_run {
        let (old_idx, new_idx) = surviving[k];
        kept_old[old_idx] = true;
        kept_new[new_idx] = true;
        if old[old_idx] != new[new_idx] {
            changed.push(new_idx);
        }
    }
    changed.sort_unstable();

    ListDiff {
        removed: positions_of(&kept_old, false),
        inserted: positions_of(&kept_new, false),
        changed,
    }
}

fn positions_of(flags: &[bool], value: bool) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| (f == value).then_some(i))
        .collect()
}

/// Returns indices into `seq` forming one longest strictly increasing
/// subsequence, in ascending order.
fn longest_increasing_run(seq: &[usize]) -> Vec<usize> {
    // tails[k] = index into seq of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&t| seq[t] < value);
        if slot > 0 {
            prev[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        run.push(i);
        cursor = prev[i];
    }
    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Photo;

    fn c(id: &str) -> ContactRecord {
        ContactRecord::new(ContactId::new(id), id.to_uppercase(), "1", Photo::Default)
    }

    fn list(ids: &str) -> Vec<ContactRecord> {
        ids.chars().map(|ch| c(&ch.to_string())).collect()
    }

    #[test]
    fn identical_lists_produce_empty_diff() {
        let rows = list("abc");
        assert!(diff_rows(&rows, &rows).is_empty());
    }

    #[test]
    fn filter_reports_only_removals() {
        let diff = diff_rows(&list("abcd"), &list("bd"));
        assert_eq!(diff.removed, vec![0, 2]);
        assert!(diff.inserted.is_empty());
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn clearing_filter_reports_only_insertions() {
        let diff = diff_rows(&list("bd"), &list("abcd"));
        assert!(diff.removed.is_empty());
        assert_eq!(diff.inserted, vec![0, 2]);
    }

    #[test]
    fn moved_row_is_removed_and_reinserted() {
        let diff = diff_rows(&list("abc"), &list("cab"));
        assert_eq!(diff.removed, vec![2]);
        assert_eq!(diff.inserted, vec![0]);
    }

    #[test]
    fn same_id_with_new_contents_is_changed() {
        let old = list("ab");
        let mut new = old.clone();
        new[1].phone_number = "999".to_string();

        let diff = diff_rows(&old, &new);
        assert!(diff.removed.is_empty());
        assert!(diff.inserted.is_empty());
        assert_eq!(diff.changed, vec![1]);
    }

    #[test]
    fn identity_ignores_shared_phone_numbers() {
        // Two contacts sharing a number stay distinct rows.
        let old = vec![c("a")];
        let new = vec![c("a"), c("b")];
        assert_eq!(diff_rows(&old, &new).inserted, vec![1]);
    }

    #[test]
    fn longest_run_is_strictly_increasing() {
        assert_eq!(longest_increasing_run(&[3, 0, 1, 4, 2, 5]), vec![1, 2, 4, 5]);
        assert!(longest_increasing_run(&[]).is_empty());
    }
}
