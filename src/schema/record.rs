//! Experiment Record - root entity of the catalog

use serde::{Deserialize, Serialize};

use super::{Row, RowId};
use crate::id::ExperimentId;

/// A versioned experiment definition.
///
/// The record is the unit of persistence: it is created whole, fetched
/// whole, and deleted whole. The id is assigned at creation and never
/// mutated. Rows keep their append order and carry stable [`RowId`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentRecord {
    id: ExperimentId,
    rows: Vec<(RowId, Row)>,
}

impl ExperimentRecord {
    /// Assemble a record from an id and its finalized rows.
    #[must_use]
    pub fn new(id: ExperimentId, rows: Vec<(RowId, Row)>) -> Self {
        Self { id, rows }
    }

    /// The record's identifier.
    #[must_use]
    pub const fn id(&self) -> ExperimentId {
        self.id
    }

    /// All rows with their stable ids, in append order.
    #[must_use]
    pub fn rows(&self) -> &[(RowId, Row)] {
        &self.rows
    }

    /// Look up a single row by its stable id.
    #[must_use]
    pub fn row(&self, row_id: RowId) -> Option<&Row> {
        self.rows
            .iter()
            .find(|(id, _)| *id == row_id)
            .map(|(_, row)| row)
    }

    /// Number of rows in the record.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the record holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
