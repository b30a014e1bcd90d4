//! Case-insensitive substring search over contact records.
//!
//! A record matches when the query occurs in its name or its phone number,
//! compared after lowercasing both sides. A blank query matches everything
//! and returns the input unchanged. Both functions are pure, so filtering an
//! already filtered list with the same query is a no-op.

use crate::domain::ContactRecord;

/// Returns `true` when `record` matches `query`.
///
/// Blank queries match every record. Empty name or number fields never match
/// a non-blank query.
///
/// ```
/// use zcontacts::app::filter::matches;
/// use zcontacts::domain::{ContactId, ContactRecord, Photo};
///
/// let ann = ContactRecord::new(ContactId::new("1"), "Ann", "123", Photo::Default);
/// assert!(matches(&ann, "AN"));
/// assert!(matches(&ann, "23"));
/// assert!(!matches(&ann, "bob"));
/// ```
#[must_use]
pub fn matches(record: &ContactRecord, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = fold_case(query);
    contains_folded(&record.name, &needle) || contains_folded(&record.phone_number, &needle)
}

/// Lowercases `text` one character at a time.
///
/// Match highlighting folds the same way, so every row that passes the
/// filter also has a highlight. Characters may fold to more than one
/// character (`İ` becomes `i` plus a combining dot).
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    !haystack.is_empty() && fold_case(haystack).contains(folded_needle)
}

/// Filters `records` by `query`, preserving the original order.
///
/// ```
/// use zcontacts::app::filter::filter;
/// use zcontacts::domain::{ContactId, ContactRecord, Photo};
///
/// let contacts = vec![
///     ContactRecord::new(ContactId::new("1"), "Ann", "123", Photo::Default),
///     ContactRecord::new(ContactId::new("2"), "Bob", "456", Photo::Default),
/// ];
/// let found = filter(&contacts, "an");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Ann");
/// ```
#[must_use]
pub fn filter(records: &[ContactRecord], query: &str) -> Vec<ContactRecord> {
    if query.trim().is_empty() {
        return records.to_vec();
    }
    let _span = tracing::trace_span!("search_filter", total = records.len(), query_len = query.len()).entered();

    records
        .iter()
        .filter(|record| matches(record, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactId, Photo};

    fn contact(id: &str, name: &str, phone: &str) -> ContactRecord {
        ContactRecord::new(ContactId::new(id), name, phone, Photo::Default)
    }

    fn sample() -> Vec<ContactRecord> {
        vec![
            contact("1", "Ann", "123"),
            contact("2", "Bob", "456"),
            contact("3", "Joanna", ""),
            contact("4", "", "+1 555 0100"),
            contact("5", "ÅSA Lind", "789"),
        ]
    }

    #[test]
    fn blank_query_returns_input_unchanged() {
        let contacts = sample();
        assert_eq!(filter(&contacts, ""), contacts);
        assert_eq!(filter(&contacts, "   "), contacts);
    }

    #[test]
    fn matches_name_or_number_case_insensitively() {
        let contacts = sample();

        let names: Vec<_> = filter(&contacts, "AN").into_iter().map(|c| c.id).collect();
        assert_eq!(names, vec![ContactId::new("1"), ContactId::new("3")]);

        let by_number = filter(&contacts, "555");
        assert_eq!(by_number.len(), 1);
        assert_eq!(by_number[0].id, ContactId::new("4"));
    }

    #[test]
    fn ann_and_bob_scenario() {
        let contacts = vec![contact("a", "Ann", "123"), contact("b", "Bob", "456")];
        assert_eq!(filter(&contacts, "an"), vec![contact("a", "Ann", "123")]);
    }

    #[test]
    fn empty_fields_never_match_non_blank_query() {
        let nobody = contact("x", "", "");
        assert!(!matches(&nobody, "a"));
        assert!(matches(&nobody, ""));
    }

    #[test]
    fn folds_non_ascii_letters() {
        let contacts = sample();
        let found = filter(&contacts, "åsa");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ContactId::new("5"));
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let contacts = sample();
        for query in ["a", "1", "jo", "zzz", " "] {
            let once = filter(&contacts, query);
            assert_eq!(filter(&once, query), once, "query {query:?}");

            let positions: Vec<usize> = once
                .iter()
                .map(|c| contacts.iter().position(|o| o.id == c.id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn inclusion_follows_substring_rule() {
        let contacts = sample();
        for query in ["a", "N", "45", "+1", "lind", "q"] {
            let result = filter(&contacts, query);
            let q = query.to_lowercase();
            for record in &contacts {
                let expected = record.name.to_lowercase().contains(&q)
                    || record.phone_number.to_lowercase().contains(&q);
                assert_eq!(result.contains(record), expected, "{query:?} vs {record:?}");
            }
        }
    }
}
