//! In-memory record store implementation using `DashMap`.
//!
//! This is the default backend - data is lost on process restart. A
//! document-database adapter implements the same trait for persistence.

use super::RecordStore;
use crate::schema::ExperimentRecord;
use crate::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory record store using a lock-free concurrent hashmap.
///
/// Thread-safe; the `DashMap` entry API makes insert-if-absent atomic, so
/// two writers racing on the same identifier get exactly one winner.
///
/// # Example
///
/// ```rust
/// use leverdb::id::ExperimentId;
/// use leverdb::schema::{ExperimentRecord, Lever, Program};
/// use leverdb::store::{MemoryRecordStore, RecordStore};
///
/// # async fn example() -> leverdb::Result<()> {
/// let store = MemoryRecordStore::new();
/// let id = ExperimentId::new(Program::Email, Lever::Timing, 1);
/// store.insert(ExperimentRecord::new(id, Vec::new())).await?;
/// assert!(store.get("Email_timing_V1").await?.is_some());
/// # Ok(())
/// # }
/// ```
pub struct MemoryRecordStore {
    records: DashMap<String, ExperimentRecord>,
}

impl MemoryRecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Create with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.records.clear();
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self.records.iter().map(|entry| entry.key().clone()).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<ExperimentRecord>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, record: ExperimentRecord) -> Result<()> {
        let key = record.id().to_string();
        match self.records.entry(key) {
            Entry::Occupied(occupied) => Err(Error::DuplicateId(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }
}
