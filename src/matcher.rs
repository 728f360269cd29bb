//! Attribute-equality matching over candidate rows.
//!
//! The target is a conjunctive filter: a row matches when every target
//! attribute is present with an exactly equal value (case-sensitive, no
//! normalization, no wildcards). Attributes the row carries beyond the
//! target are ignored, and an empty target matches every candidate. The
//! matcher is a pure function over an immutable snapshot; candidates come
//! back in input order.

use std::collections::BTreeMap;

use crate::schema::{Attribute, Row};

/// Whether a single row satisfies every predicate in the target.
///
/// A target attribute the row does not carry is a non-match, not an error.
#[must_use]
pub fn row_matches(target: &BTreeMap<Attribute, String>, row: &Row) -> bool {
    target
        .iter()
        .all(|(attribute, value)| row.attributes().get(attribute) == Some(value))
}

/// Filter candidate rows down to those matching the target.
///
/// Keys are carried through untouched so callers can match over a record's
/// `(RowId, Row)` pairs or any other keyed snapshot; input order is
/// preserved and no matches yields an empty vector.
#[must_use]
pub fn match_rows<'a, K>(
    target: &BTreeMap<Attribute, String>,
    candidates: impl IntoIterator<Item = &'a (K, Row)>,
) -> Vec<(K, &'a Row)>
where
    K: Clone + 'a,
{
    candidates
        .into_iter()
        .filter(|(_, row)| row_matches(target, row))
        .map(|(key, row)| (key.clone(), row))
        .collect()
}
