//! Contact source abstraction.

use crate::domain::error::Result;
use crate::domain::ContactRecord;

/// Source of contact snapshots.
///
/// Implementations are called from the worker thread and may block on I/O.
/// Every call enumerates the source afresh and returns new records, each with
/// a name, a phone number (empty when absent) and a photo (the default image
/// when absent or undecodable).
///
/// # Implementations
///
/// - [`VcardDirectory`](crate::contacts::VcardDirectory): a directory of
///   `.vcf` files
pub trait ContactRepository: Send {
    /// Returns all contacts, or those whose name or number contains `query`
    /// case-insensitively when a non-blank query is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the source itself cannot be read. Problems with
    /// individual entries are logged and skipped instead.
    fn fetch_all(&self, query: Option<&str>) -> Result<Vec<ContactRecord>>;
}
