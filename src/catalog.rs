//! Experiment Catalog - create / list / test / delete flows over a store.
//!
//! Identifier generation and insertion are separate store operations, so two
//! concurrent creators can race on the same `(program, lever)` version. The
//! store's insert-if-absent turns that race into a [`Error::DuplicateId`],
//! and the catalog resolves it with a bounded re-read-and-retry loop.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::draft::DraftRecord;
use crate::error::{Error, MalformedId, Result};
use crate::id::{generate_id, ExperimentId};
use crate::matcher::match_rows;
use crate::schema::{Attribute, ExperimentRecord, Row, RowId};
use crate::store::RecordStore;

/// Attempts at winning the id race before giving up with the store's error.
const CREATE_RETRIES: usize = 3;

/// Listing of every stored experiment, split into parseable entries and
/// malformed identifiers that were skipped.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    entries: Vec<ExperimentId>,
    malformed: Vec<MalformedId>,
}

impl Listing {
    /// Identifiers that parsed into `(program, lever, version)`.
    #[must_use]
    pub fn entries(&self) -> &[ExperimentId] {
        &self.entries
    }

    /// Stored identifiers that failed to parse, with reasons.
    #[must_use]
    pub fn malformed(&self) -> &[MalformedId] {
        &self.malformed
    }
}

/// Façade over a [`RecordStore`] implementing the catalog operations.
#[derive(Debug)]
pub struct ExperimentCatalog<S> {
    store: S,
}

impl<S: RecordStore> ExperimentCatalog<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create an experiment from a draft: validate, generate the lowest free
    /// id for the draft's `(program, lever)`, finalize, insert.
    ///
    /// The id is generated against a fresh read of the stored ids on every
    /// attempt; losing the insert race re-reads and retries, a bounded
    /// number of times.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] with the full report if any draft field is
    /// invalid; [`Error::Store`] on adapter failure; [`Error::DuplicateId`]
    /// only if every retry loses the race.
    pub async fn create(&self, draft: DraftRecord) -> Result<ExperimentId> {
        let report = draft.validate();
        let (Some(program), Some(lever)) = (draft.program(), draft.lever()) else {
            return Err(Error::Validation(report));
        };
        if !report.is_empty() {
            return Err(Error::Validation(report));
        }

        let mut attempt = 0;
        loop {
            let existing: HashSet<String> = self.store.list_ids().await?.into_iter().collect();
            let id = generate_id(program, lever, &existing);
            let record = draft.clone().finalize(id)?;

            match self.store.insert(record).await {
                Ok(()) => {
                    debug!(%id, rows = draft.rows().len(), "experiment created");
                    return Ok(id);
                }
                Err(Error::DuplicateId(taken)) if attempt < CREATE_RETRIES => {
                    attempt += 1;
                    debug!(id = %taken, attempt, "lost id race, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// List every stored experiment.
    ///
    /// Identifiers that do not parse are skipped with a warning and reported
    /// in the listing's `malformed` section; they never abort the listing.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] if the adapter cannot list.
    pub async fn list(&self) -> Result<Listing> {
        let mut listing = Listing::default();
        for raw in self.store.list_ids().await? {
            match raw.parse::<ExperimentId>() {
                Ok(id) => listing.entries.push(id),
                Err(bad) => {
                    warn!(id = %bad.id, reason = %bad.reason, "skipping malformed experiment id");
                    listing.malformed.push(bad);
                }
            }
        }
        Ok(listing)
    }

    /// Fetch a full record.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on adapter failure; an unknown id is `None`.
    pub async fn get(&self, id: ExperimentId) -> Result<Option<ExperimentRecord>> {
        self.store.get(&id.to_string()).await
    }

    /// Test a record: return every row whose attributes match the target,
    /// under conjunctive-filter semantics (see [`crate::matcher`]).
    ///
    /// A record that no longer exists yields an empty result, since "no
    /// match" is an expected outcome of normal use.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on adapter failure.
    pub async fn test(
        &self,
        id: ExperimentId,
        target: &BTreeMap<Attribute, String>,
    ) -> Result<Vec<(RowId, Row)>> {
        let Some(record) = self.store.get(&id.to_string()).await? else {
            debug!(%id, "test query against unknown experiment");
            return Ok(Vec::new());
        };

        let matched = match_rows(target, record.rows())
            .into_iter()
            .map(|(row_id, row)| (row_id, row.clone()))
            .collect();
        Ok(matched)
    }

    /// Delete a record whole.
    ///
    /// Returns `false` (not an error) if the id was unknown.
    ///
    /// # Errors
    ///
    /// [`Error::Store`] on adapter failure.
    pub async fn delete(&self, id: ExperimentId) -> Result<bool> {
        let removed = self.store.delete(&id.to_string()).await?;
        if removed {
            debug!(%id, "experiment deleted");
        } else {
            debug!(%id, "delete of unknown experiment");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::RowInput;
    use crate::schema::{Lever, Program};
    use crate::store::MemoryRecordStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft_with_row(value: &str) -> DraftRecord {
        let mut draft = DraftRecord::new();
        draft.set_program(Program::Email);
        draft.set_lever(Lever::Timing);
        draft.set_attributes(vec![Attribute::Green]);
        draft.append_row(
            RowInput::new(date(2024, 1, 1), date(2024, 2, 1)).attribute(Attribute::Green, value),
        );
        draft
    }

    #[tokio::test]
    async fn test_create_assigns_successive_versions() {
        let catalog = ExperimentCatalog::new(MemoryRecordStore::new());

        let first = catalog.create(draft_with_row("A")).await.unwrap();
        let second = catalog.create(draft_with_row("B")).await.unwrap();

        assert_eq!(first.to_string(), "Email_timing_V1");
        assert_eq!(second.to_string(), "Email_timing_V2");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_touching_store() {
        let catalog = ExperimentCatalog::new(MemoryRecordStore::new());

        let err = catalog.create(DraftRecord::new()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(catalog.store().is_empty());
    }

    #[tokio::test]
    async fn test_test_query_matches_rows() {
        let catalog = ExperimentCatalog::new(MemoryRecordStore::new());
        let id = catalog.create(draft_with_row("A")).await.unwrap();

        let mut target = BTreeMap::new();
        target.insert(Attribute::Green, "A".to_string());
        let matched = catalog.test(id, &target).await.unwrap();
        assert_eq!(matched.len(), 1);

        target.insert(Attribute::Green, "B".to_string());
        assert!(catalog.test(id, &target).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_test_query_against_deleted_record_is_empty() {
        let catalog = ExperimentCatalog::new(MemoryRecordStore::new());
        let id = catalog.create(draft_with_row("A")).await.unwrap();

        assert!(catalog.delete(id).await.unwrap());
        assert!(!catalog.delete(id).await.unwrap());

        let matched = catalog.test(id, &BTreeMap::new()).await.unwrap();
        assert!(matched.is_empty());
    }

    #[tokio::test]
    async fn test_list_parses_entries() {
        let catalog = ExperimentCatalog::new(MemoryRecordStore::new());
        catalog.create(draft_with_row("A")).await.unwrap();

        let listing = catalog.list().await.unwrap();
        assert_eq!(listing.entries().len(), 1);
        assert!(listing.malformed().is_empty());
        assert_eq!(listing.entries()[0].program(), Program::Email);
    }
}
