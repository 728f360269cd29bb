//! Experiment Definition Schema
//!
//! Data structures for versioned experiment definitions:
//!
//! ```text
//! ExperimentRecord (1) ──< (RowId, Row) (N)
//!                               │
//!                               ├── attributes  [Attribute -> value]
//!                               └── levels      ["{kind}_{stage}" -> value]
//! ```
//!
//! Option sets ([`Program`], [`Lever`], [`Attribute`], [`LevelKind`]) are
//! closed enums; their names never contain `_`, which keeps the identifier
//! format `"{program}_{lever}_V{version}"` parseable.

mod options;
mod record;
mod row;

pub use options::{level_keys, Attribute, Lever, LevelKind, Program};
pub use record::ExperimentRecord;
pub use row::{Row, RowId};
