//! Draft Record - caller-owned builder for experiment records.
//!
//! The draft replaces ambient per-session state: the caller holds the draft,
//! appends rows to it as the user fills the form, and finalizes it into an
//! [`ExperimentRecord`] once an id has been generated. Validation collects
//! every violation into one report so the user can fix all fields in a
//! single pass.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::error::{Error, Result, ValidationIssue, ValidationReport};
use crate::id::ExperimentId;
use crate::schema::{level_keys, Attribute, ExperimentRecord, Lever, Program, Row, RowId};

/// Raw per-row field inputs, as entered by the user.
///
/// Attribute and level values are looked up by key at finalize time; keys
/// the record does not declare are dropped, declared keys with no input
/// become empty strings. This keeps every finalized row's mappings keyed
/// exactly as the record requires (no partial rows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInput {
    attribute_values: BTreeMap<Attribute, String>,
    level_values: BTreeMap<String, String>,
    lever_value: String,
    champion_lever_value: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl RowInput {
    /// Start a row input covering the given date window.
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            attribute_values: BTreeMap::new(),
            level_values: BTreeMap::new(),
            lever_value: String::new(),
            champion_lever_value: String::new(),
            start_date,
            end_date,
        }
    }

    /// Set the value entered for one attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.attribute_values.insert(attribute, value.into());
        self
    }

    /// Set the value entered for one level key (e.g. `"intervention_1"`).
    #[must_use]
    pub fn level(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.level_values.insert(key.into(), value.into());
        self
    }

    /// Set the value under test for the record's lever.
    #[must_use]
    pub fn lever_value(mut self, value: impl Into<String>) -> Self {
        self.lever_value = value.into();
        self
    }

    /// Set the champion comparison value for the record's lever.
    #[must_use]
    pub fn champion_lever_value(mut self, value: impl Into<String>) -> Self {
        self.champion_lever_value = value.into();
        self
    }

    /// First day of the row's experiment window.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the row's experiment window.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// An in-progress experiment record.
///
/// Rows appended to the draft get the next sequential [`RowId`]; appending
/// never renumbers existing rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRecord {
    program: Option<Program>,
    lever: Option<Lever>,
    attributes: Vec<Attribute>,
    stage_count: u32,
    rows: Vec<(RowId, RowInput)>,
    next_row: RowId,
}

impl DraftRecord {
    /// Start an empty draft with a single stage and no rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: None,
            lever: None,
            attributes: Vec::new(),
            stage_count: 1,
            rows: Vec::new(),
            next_row: RowId::new(0),
        }
    }

    /// Select the program.
    pub fn set_program(&mut self, program: Program) {
        self.program = Some(program);
    }

    /// Select the lever.
    pub fn set_lever(&mut self, lever: Lever) {
        self.lever = Some(lever);
    }

    /// Select the attribute set every row must cover.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }

    /// Declare the number of intervention stages (must be at least 1).
    pub fn set_stage_count(&mut self, stage_count: u32) {
        self.stage_count = stage_count;
    }

    /// Append a row, returning its stable id.
    pub fn append_row(&mut self, input: RowInput) -> RowId {
        let row_id = self.next_row;
        self.next_row = row_id.next();
        self.rows.push((row_id, input));
        row_id
    }

    /// The selected program, if any.
    #[must_use]
    pub const fn program(&self) -> Option<Program> {
        self.program
    }

    /// The selected lever, if any.
    #[must_use]
    pub const fn lever(&self) -> Option<Lever> {
        self.lever
    }

    /// The selected attribute set.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The declared stage count.
    #[must_use]
    pub const fn stage_count(&self) -> u32 {
        self.stage_count
    }

    /// Appended rows with their stable ids, in append order.
    #[must_use]
    pub fn rows(&self) -> &[(RowId, RowInput)] {
        &self.rows
    }

    /// Check every field, collecting all violations instead of stopping at
    /// the first. An empty report means the draft can be finalized.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.program.is_none() {
            report.push(ValidationIssue::MissingProgram);
        }
        if self.lever.is_none() {
            report.push(ValidationIssue::MissingLever);
        }
        if self.stage_count == 0 {
            report.push(ValidationIssue::ZeroStages);
        }
        for (row_id, input) in &self.rows {
            if input.start_date > input.end_date {
                report.push(ValidationIssue::DateRange {
                    row: *row_id,
                    start: input.start_date,
                    end: input.end_date,
                });
            }
        }
        report
    }

    /// Finalize the draft into a record under the given id.
    ///
    /// Re-validates first; every row's attribute mapping is synthesized over
    /// exactly the selected attribute set and its level mapping over the full
    /// `"{kind}_{stage}"` grid, with missing inputs becoming empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying the full report if any field
    /// is invalid.
    pub fn finalize(self, id: ExperimentId) -> Result<ExperimentRecord> {
        let report = self.validate();
        if !report.is_empty() {
            return Err(Error::Validation(report));
        }

        let Self {
            attributes,
            stage_count,
            rows,
            ..
        } = self;

        let keys = level_keys(stage_count);
        let rows = rows
            .into_iter()
            .map(|(row_id, input)| {
                let row_attributes: BTreeMap<Attribute, String> = attributes
                    .iter()
                    .map(|attr| {
                        let value = input.attribute_values.get(attr).cloned().unwrap_or_default();
                        (*attr, value)
                    })
                    .collect();
                let row_levels: BTreeMap<String, String> = keys
                    .iter()
                    .map(|key| {
                        let value = input.level_values.get(key).cloned().unwrap_or_default();
                        (key.clone(), value)
                    })
                    .collect();
                let row = Row::new(
                    row_attributes,
                    row_levels,
                    input.lever_value,
                    input.champion_lever_value,
                    input.start_date,
                    input.end_date,
                );
                (row_id, row)
            })
            .collect();

        Ok(ExperimentRecord::new(id, rows))
    }
}

impl Default for DraftRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_draft() -> DraftRecord {
        let mut draft = DraftRecord::new();
        draft.set_program(Program::Email);
        draft.set_lever(Lever::Timing);
        draft.set_attributes(vec![Attribute::Green, Attribute::Red]);
        draft
    }

    #[test]
    fn test_empty_draft_reports_all_missing_fields() {
        let mut draft = DraftRecord::new();
        draft.set_stage_count(0);

        let report = draft.validate();
        assert_eq!(
            report.issues(),
            &[
                ValidationIssue::MissingProgram,
                ValidationIssue::MissingLever,
                ValidationIssue::ZeroStages,
            ]
        );
    }

    #[test]
    fn test_date_inversion_is_reported_per_row() {
        let mut draft = valid_draft();
        draft.append_row(RowInput::new(date(2024, 1, 1), date(2024, 2, 1)));
        let bad = draft.append_row(RowInput::new(date(2024, 3, 1), date(2024, 2, 1)));

        let report = draft.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.issues()[0],
            ValidationIssue::DateRange {
                row: bad,
                start: date(2024, 3, 1),
                end: date(2024, 2, 1),
            }
        );
    }

    #[test]
    fn test_equal_dates_are_valid() {
        let mut draft = valid_draft();
        draft.append_row(RowInput::new(date(2024, 1, 1), date(2024, 1, 1)));
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_append_assigns_sequential_stable_ids() {
        let mut draft = valid_draft();
        let first = draft.append_row(RowInput::new(date(2024, 1, 1), date(2024, 2, 1)));
        let second = draft.append_row(RowInput::new(date(2024, 1, 1), date(2024, 2, 1)));

        assert_eq!(first, RowId::new(0));
        assert_eq!(second, RowId::new(1));
        assert_eq!(draft.rows()[0].0, first);
        assert_eq!(draft.rows()[1].0, second);
    }

    #[test]
    fn test_finalize_synthesizes_full_mappings() {
        let mut draft = valid_draft();
        draft.set_stage_count(2);
        draft.append_row(
            RowInput::new(date(2024, 1, 1), date(2024, 2, 1))
                .attribute(Attribute::Green, "A")
                .level("intervention_1", "5mg")
                .lever_value("08:00")
                .champion_lever_value("12:00"),
        );

        let id = ExperimentId::new(Program::Email, Lever::Timing, 1);
        let record = draft.finalize(id).unwrap();
        let (_, row) = &record.rows()[0];

        // Selected-but-unentered attribute appears with an empty value.
        assert_eq!(row.attributes().get(&Attribute::Green).unwrap(), "A");
        assert_eq!(row.attributes().get(&Attribute::Red).unwrap(), "");
        assert_eq!(row.attributes().len(), 2);

        // Level grid covers every kind x stage key.
        let keys: Vec<&str> = row.levels().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["cohort_1", "cohort_2", "intervention_1", "intervention_2"]
        );
        assert_eq!(row.levels().get("intervention_1").unwrap(), "5mg");
        assert_eq!(row.levels().get("cohort_2").unwrap(), "");

        assert_eq!(row.lever_value(), "08:00");
        assert_eq!(row.champion_lever_value(), "12:00");
    }

    #[test]
    fn test_finalize_drops_undeclared_keys() {
        let mut draft = valid_draft();
        draft.append_row(
            RowInput::new(date(2024, 1, 1), date(2024, 2, 1))
                .attribute(Attribute::Blue, "stray")
                .level("intervention_9", "stray"),
        );

        let id = ExperimentId::new(Program::Email, Lever::Timing, 1);
        let record = draft.finalize(id).unwrap();
        let (_, row) = &record.rows()[0];

        assert!(!row.attributes().contains_key(&Attribute::Blue));
        assert!(!row.levels().contains_key("intervention_9"));
    }

    #[test]
    fn test_finalize_rejects_invalid_draft_with_full_report() {
        let mut draft = DraftRecord::new();
        draft.append_row(RowInput::new(date(2024, 2, 1), date(2024, 1, 1)));

        let id = ExperimentId::new(Program::Email, Lever::Timing, 1);
        let err = draft.finalize(id).unwrap_err();
        match err {
            Error::Validation(report) => assert_eq!(report.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_finalize_with_no_rows() {
        let draft = valid_draft();
        let id = ExperimentId::new(Program::Email, Lever::Timing, 1);
        let record = draft.finalize(id).unwrap();
        assert!(record.is_empty());
    }
}
