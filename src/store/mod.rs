//! Record Store Module
//!
//! Persistence seam for experiment records. The core is agnostic to the
//! backing store (document database, file, in-memory map); it only relies
//! on this trait. Retry and backoff policies belong to adapters, never to
//! the core, with one exception: [`insert`](RecordStore::insert) must be an
//! atomic insert-if-absent so identifier races surface as
//! [`Error::DuplicateId`](crate::Error::DuplicateId) instead of silent
//! overwrites.
//!
//! # Example
//!
//! ```rust,no_run
//! use leverdb::store::{MemoryRecordStore, RecordStore};
//!
//! # async fn example() -> leverdb::Result<()> {
//! let store = MemoryRecordStore::new();
//! let ids = store.list_ids().await?;
//! assert!(ids.is_empty());
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::MemoryRecordStore;

use crate::schema::ExperimentRecord;
use crate::Result;
use std::future::Future;

/// Storage adapter consumed by the catalog.
///
/// Identifiers are plain strings at this seam: a dirty backing store may
/// hold ids the core considers malformed, and listing them is still the
/// adapter's job. Not-found is `None`/`false`, never an error.
pub trait RecordStore: Send + Sync {
    /// List every stored identifier.
    fn list_ids(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Fetch a record by identifier.
    ///
    /// Returns `None` if the identifier is unknown.
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<ExperimentRecord>>> + Send;

    /// Insert a record under its own identifier, if absent.
    ///
    /// Fails with [`Error::DuplicateId`](crate::Error::DuplicateId) when the
    /// identifier is already taken; never overwrites.
    fn insert(&self, record: ExperimentRecord) -> impl Future<Output = Result<()>> + Send;

    /// Delete a record by identifier.
    ///
    /// Returns `false` if the identifier was unknown.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;
}
