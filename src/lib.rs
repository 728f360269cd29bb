//! # leverdb: Versioned Experiment-Definition Catalog
//!
//! leverdb manages versioned "experiment definition" records: configuration
//! objects describing a marketing/communication experiment (program, lever,
//! attribute segmentation, staged levels, lever timing, date range). Callers
//! create records, list them, delete them, and "test" a record by supplying
//! attribute values and getting back the stored rows whose attribute mapping
//! matches.
//!
//! ## Core pieces
//!
//! - **Identifier generation**: collision-free `"{program}_{lever}_V{n}"`
//!   ids, lowest free version first ([`id`]).
//! - **Schema**: the versioned record with its nested row/attribute/level
//!   structure ([`schema`]), built through a caller-owned draft ([`draft`]).
//! - **Matching**: conjunctive attribute-equality filtering of candidate
//!   rows ([`matcher`]).
//!
//! Persistence is an injected [`store::RecordStore`]; the crate never renders
//! UI or opens network connections.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use leverdb::catalog::ExperimentCatalog;
//! use leverdb::draft::{DraftRecord, RowInput};
//! use leverdb::schema::{Attribute, Lever, Program};
//! use leverdb::store::MemoryRecordStore;
//!
//! # async fn example() -> leverdb::Result<()> {
//! let catalog = ExperimentCatalog::new(MemoryRecordStore::new());
//!
//! let mut draft = DraftRecord::new();
//! draft.set_program(Program::Email);
//! draft.set_lever(Lever::Timing);
//! draft.set_attributes(vec![Attribute::Green]);
//! draft.set_stage_count(2);
//! draft.append_row(
//!     RowInput::new(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     )
//!     .attribute(Attribute::Green, "A")
//!     .lever_value("08:00"),
//! );
//!
//! let id = catalog.create(draft).await?;
//! assert_eq!(id.to_string(), "Email_timing_V1");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod catalog;
pub mod draft;
pub mod error;
pub mod id;
pub mod matcher;
pub mod schema;
pub mod store;

pub use error::{Error, Result};
