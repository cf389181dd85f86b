//! Photo catalog persistence.
//!
//! [`CatalogStore`] is the seam the tagging session writes through;
//! [`SqliteCatalog`] is the on-disk implementation.

pub mod schema;
mod sqlite;

pub use sqlite::SqliteCatalog;

use crate::error::StoreResult;
use crate::types::PhotoRecord;

/// Durable store of [`PhotoRecord`]s keyed by content fingerprint.
pub trait CatalogStore {
    /// Insert or overwrite the record for `record.fingerprint`.
    ///
    /// Every mutable column is replaced and the timestamp refreshed; the
    /// caller's `timestamp` is ignored. Records without a fingerprint are
    /// keyed by `filepath` among other fingerprint-less records.
    fn upsert(&mut self, record: &PhotoRecord) -> StoreResult<()>;

    /// Look up a record by fingerprint.
    fn get(&self, fingerprint: &str) -> StoreResult<Option<PhotoRecord>>;

    /// All records, ordered by filepath.
    fn list(&self) -> StoreResult<Vec<PhotoRecord>>;

    /// Number of records.
    fn count(&self) -> StoreResult<usize>;
}
