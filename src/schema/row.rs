//! Row - one sub-experiment configuration within a record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Attribute;

/// Stable identifier for a row within its record.
///
/// Assigned sequentially at append time and never reassigned, so appending
/// or (future) reordering cannot silently change what an existing id means.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct RowId(u32);

impl RowId {
    /// Wrap a raw row number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw row number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The id that follows this one in append order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concrete sub-experiment configuration nested under a record.
///
/// The attribute mapping holds exactly the attribute keys selected for the
/// parent record; the level mapping covers the full `"{kind}_{stage}"` grid
/// for the record's stage count. Values are free text and may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Row {
    attributes: BTreeMap<Attribute, String>,
    levels: BTreeMap<String, String>,
    lever_value: String,
    champion_lever_value: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl Row {
    /// Assemble a row from its already-validated parts.
    #[must_use]
    pub fn new(
        attributes: BTreeMap<Attribute, String>,
        levels: BTreeMap<String, String>,
        lever_value: impl Into<String>,
        champion_lever_value: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            attributes,
            levels,
            lever_value: lever_value.into(),
            champion_lever_value: champion_lever_value.into(),
            start_date,
            end_date,
        }
    }

    /// The segmentation values, one per selected attribute.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<Attribute, String> {
        &self.attributes
    }

    /// The staged level values, keyed `"{kind}_{stage}"`.
    #[must_use]
    pub const fn levels(&self) -> &BTreeMap<String, String> {
        &self.levels
    }

    /// The value under test for the record's lever.
    #[must_use]
    pub fn lever_value(&self) -> &str {
        &self.lever_value
    }

    /// The champion comparison value for the same lever.
    #[must_use]
    pub fn champion_lever_value(&self) -> &str {
        &self.champion_lever_value
    }

    /// First day of the experiment window.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the experiment window (inclusive; never before the start).
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_row_id_sequence() {
        let first = RowId::new(0);
        assert_eq!(first.next(), RowId::new(1));
        assert_eq!(first.next().value(), 1);
        assert_eq!(format!("{first}"), "0");
    }

    #[test]
    fn test_row_accessors() {
        let mut attributes = BTreeMap::new();
        attributes.insert(Attribute::Green, "A".to_string());

        let mut levels = BTreeMap::new();
        levels.insert("intervention_1".to_string(), "5mg".to_string());

        let row = Row::new(
            attributes,
            levels,
            "morning",
            "evening",
            date(2024, 1, 1),
            date(2024, 3, 1),
        );

        assert_eq!(row.attributes().get(&Attribute::Green).unwrap(), "A");
        assert_eq!(row.levels().get("intervention_1").unwrap(), "5mg");
        assert_eq!(row.lever_value(), "morning");
        assert_eq!(row.champion_lever_value(), "evening");
        assert!(row.start_date() < row.end_date());
    }

    #[test]
    fn test_row_serde_round_trip() {
        let mut attributes = BTreeMap::new();
        attributes.insert(Attribute::Blue, String::new());

        let row = Row::new(
            attributes,
            BTreeMap::new(),
            "",
            "",
            date(2024, 6, 1),
            date(2024, 6, 1),
        );

        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }
}
