//! Expandable list state: the displayed rows plus at most one expanded row.
//!
//! Expansion is tracked as a position into the current rows instead of a
//! flag on each record, so the "never more than one expanded row" rule holds
//! by construction.

use super::diff::{diff_rows, ListDiff};
use crate::domain::ContactRecord;

/// Row-level update emitted by [`ExpandableList::on_item_tapped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowUpdate {
    Collapsed(usize),
    Expanded(usize),
}

/// A record paired with its expansion flag, as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<'a> {
    pub record: &'a ContactRecord,
    pub is_expanded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExpandableList {
    rows: Vec<ContactRecord>,
    expanded: Option<usize>,
}

impl ExpandableList {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new(), expanded: None }
    }

    /// Toggles the row at `position`.
    ///
    /// A different expanded row is collapsed first, so tapping row 1 while
    /// row 0 is open yields `[Collapsed(0), Expanded(1)]`. Tapping the open
    /// row collapses it. Out-of-range positions change nothing.
    ///
    /// ```
    /// use zcontacts::app::expansion::{ExpandableList, RowUpdate};
    /// use zcontacts::domain::{ContactId, ContactRecord, Photo};
    ///
    /// let mut list = ExpandableList::new();
    /// list.on_list_replaced(vec![
    ///     ContactRecord::new(ContactId::new("a"), "Ann", "1", Photo::Default),
    ///     ContactRecord::new(ContactId::new("b"), "Bob", "2", Photo::Default),
    /// ]);
    ///
    /// assert_eq!(list.on_item_tapped(0), vec![RowUpdate::Expanded(0)]);
    /// assert_eq!(
    ///     list.on_item_tapped(1),
    ///     vec![RowUpdate::Collapsed(0), RowUpdate::Expanded(1)]
    /// );
    /// ```
    pub fn on_item_tapped(&mut self, position: usize) -> Vec<RowUpdate> {
        if position >= self.rows.len() {
            tracing::debug!(position, len = self.rows.len(), "tap outside list ignored");
            return vec![];
        }

        match self.expanded {
            Some(open) if open == position => {
                self.expanded = None;
                vec![RowUpdate::Collapsed(position)]
            }
            Some(open) => {
                self.expanded = Some(position);
                vec![RowUpdate::Collapsed(open), RowUpdate::Expanded(position)]
            }
            None => {
                self.expanded = Some(position);
                vec![RowUpdate::Expanded(position)]
            }
        }
    }

    /// Adopts a freshly fetched list. Any expansion is dropped.
    pub fn on_list_replaced(&mut self, rows: Vec<ContactRecord>) -> ListDiff {
        let diff = diff_rows(&self.rows, &rows);
        self.rows = rows;
        self.expanded = None;
        diff
    }

    /// Adopts a filtered view of the current fetch.
    ///
    /// The expanded contact stays expanded when it is still present, now at
    /// its new position.
    pub fn on_list_filtered(&mut self, rows: Vec<ContactRecord>) -> ListDiff {
        let expanded_id = self.expanded_record().map(|r| r.id.clone());
        let diff = diff_rows(&self.rows, &rows);
        self.expanded = expanded_id.and_then(|id| rows.iter().position(|r| r.id == id));
        self.rows = rows;
        diff
    }

    #[must_use]
    pub fn rows(&self) -> Vec<RowView<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, record)| RowView { record, is_expanded: self.expanded == Some(i) })
            .collect()
    }

    #[must_use]
    pub fn records(&self) -> &[ContactRecord] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ContactRecord> {
        self.rows.get(position)
    }

    #[must_use]
    pub const fn expanded_position(&self) -> Option<usize> {
        self.expanded
    }

    #[must_use]
    pub fn expanded_record(&self) -> Option<&ContactRecord> {
        self.expanded.and_then(|i| self.rows.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
