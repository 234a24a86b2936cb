//! Canonical trace rows and raw export records
//!
//! A trace export arrives as loosely-typed records whose headers vary in
//! case and spacing ("Object Name", "objectname", " Statement "). This
//! module resolves them into immutable [`TraceRow`] values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One captured SQL execution record: accessed object plus statement text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceRow {
    /// Name of the object/table the statement accessed
    pub object_name: String,
    /// The executed SQL statement text
    pub statement: String,
}

impl TraceRow {
    /// Create a row, trimming both fields
    #[inline]
    #[must_use]
    pub fn new(object_name: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into().trim().to_string(),
            statement: statement.into().trim().to_string(),
        }
    }
}

/// One raw record from a tabular export, keyed by original header text
///
/// Header order is preserved so diagnostics can show the export as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Header → cell value, in original column order
    pub cells: IndexMap<String, String>,
}

impl RawRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell under its original header
    #[inline]
    #[must_use]
    pub fn with_cell(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(header.into(), value.into());
        self
    }

    /// Look up a cell by header, ignoring case and surrounding whitespace
    ///
    /// `aliases` lets callers accept header variants ("object name",
    /// "objectname") for the same logical column.
    #[must_use]
    pub fn get_ci(&self, aliases: &[&str]) -> Option<&str> {
        self.cells.iter().find_map(|(header, value)| {
            let normalized = header.trim().to_lowercase();
            aliases
                .iter()
                .any(|a| normalized == *a)
                .then_some(value.as_str())
        })
    }

    /// Whether any header resolves to one of `aliases`
    #[must_use]
    pub fn has_column(&self, aliases: &[&str]) -> bool {
        self.cells
            .keys()
            .any(|header| aliases.contains(&header.trim().to_lowercase().as_str()))
    }
}

/// The canonical dataset produced by normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrace {
    /// Deduplicated, exclusion-filtered rows in first-seen order
    pub rows: Vec<TraceRow>,
    /// Every distinct object name observed before exclusion, upper-cased
    pub observed_tables: BTreeSet<String>,
}

impl NormalizedTrace {
    /// Distinct upper-cased table names that survived exclusion
    #[must_use]
    pub fn surviving_tables(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .map(|r| r.object_name.to_uppercase())
            .collect()
    }

    /// Number of canonical rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the trace is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trace_row_trims_fields() {
        let row = TraceRow::new("  ZCUST01 ", " SELECT * FROM ZCUST01 ");
        assert_eq!(row.object_name, "ZCUST01");
        assert_eq!(row.statement, "SELECT * FROM ZCUST01");
    }

    #[test]
    fn raw_record_case_insensitive_lookup() {
        let rec = RawRecord::new()
            .with_cell(" OBJECT NAME ", "ZCUST01")
            .with_cell("Statement", "SELECT *");

        assert_eq!(
            rec.get_ci(&["object name", "objectname"]),
            Some("ZCUST01")
        );
        assert_eq!(rec.get_ci(&["statement"]), Some("SELECT *"));
        assert_eq!(rec.get_ci(&["missing"]), None);
    }

    #[test]
    fn raw_record_has_column() {
        let rec = RawRecord::new().with_cell("ObjectName", "T001");
        assert!(rec.has_column(&["object name", "objectname"]));
        assert!(!rec.has_column(&["statement"]));
    }

    #[test]
    fn surviving_tables_upper_cased() {
        let trace = NormalizedTrace {
            rows: vec![
                TraceRow::new("zcust01", "SELECT 1"),
                TraceRow::new("ZCUST01", "SELECT 2"),
            ],
            observed_tables: BTreeSet::new(),
        };
        let tables = trace.surviving_tables();
        assert_eq!(tables.len(), 1);
        assert!(tables.contains("ZCUST01"));
    }
}
