//! Error types for leverdb
//!
//! Validation problems are collected into a [`ValidationReport`] so a caller
//! can show every field error in one pass instead of fixing them one at a
//! time. "Not found" is modeled as `Option`/empty results, never as an error.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use crate::schema::RowId;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// leverdb error types
#[derive(Error, Debug)]
pub enum Error {
    /// One or more draft fields failed validation; the report lists all of them
    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    /// RecordStore adapter failure, reason string preserved verbatim
    #[error("store error: {0}")]
    Store(String),

    /// Insert-if-absent found the identifier already taken
    #[error("duplicate experiment id: {0}")]
    DuplicateId(String),

    /// A stored identifier does not parse back into (program, lever, version)
    #[error(transparent)]
    MalformedId(#[from] MalformedId),
}

/// A stored identifier string that does not round-trip through
/// [`ExperimentId`](crate::id::ExperimentId) parsing.
///
/// Listings skip these entries with a warning rather than aborting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed experiment id {id:?}: {reason}")]
pub struct MalformedId {
    /// The raw identifier string as found in the store.
    pub id: String,
    /// Why it failed to parse.
    pub reason: String,
}

/// A single field-level validation violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// No program was selected for the draft.
    #[error("no program selected")]
    MissingProgram,

    /// No lever was selected for the draft.
    #[error("no lever selected")]
    MissingLever,

    /// The stage count must be a positive integer.
    #[error("stage count must be at least 1")]
    ZeroStages,

    /// A row's start date falls after its end date.
    #[error("row {row}: start date {start} is after end date {end}")]
    DateRange {
        /// Stable id of the offending row.
        row: RowId,
        /// The row's start date.
        start: NaiveDate,
        /// The row's end date.
        end: NaiveDate,
    },
}

/// Every validation violation found in a draft, in field order.
///
/// An empty report means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Record a violation.
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// All violations, in the order they were found.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Whether the report contains no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of violations in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}
