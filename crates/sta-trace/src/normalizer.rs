//! Trace normalization
//!
//! Cleans a raw SQL-trace export into the canonical two-column dataset:
//! - resolves case/whitespace-tolerant headers,
//! - drops rows under system/metadata prefixes,
//! - deduplicates by `(object_name, statement)` keeping first occurrence,
//! - renders the result as CSV text for prompt construction.

use crate::error::TraceError;
use crate::row::{NormalizedTrace, RawRecord, TraceRow};
use std::collections::{BTreeSet, HashSet};

/// Accepted header spellings for the object-name column
const OBJECT_NAME_ALIASES: &[&str] = &["object name", "objectname"];

/// Accepted header spellings for the statement column
const STATEMENT_ALIASES: &[&str] = &["statement"];

/// Object-name prefixes excluded from analysis
///
/// These identify dictionary tables, repository/text load artifacts and
/// trace-tool internals that carry no transactional signal.
pub const EXCLUDED_PREFIXES: &[&str] = &[
    "DD",         // data dictionary tables
    "D010",       // ABAP load artifacts
    "REPOSRC",    // report source repository
    "REPOLOAD",   // report load
    "DYNPSOURCE", // screen source
    "DYNPLOAD",   // screen load
    "DOKTL",      // documentation text lines
    "ATAB",       // pooled table container
];

/// Normalizes raw trace exports into canonical rows
#[derive(Debug, Clone, Default)]
pub struct TraceNormalizer;

impl TraceNormalizer {
    /// Create a normalizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Normalize loosely-typed export records
    ///
    /// Records missing either column are discarded before normalization.
    ///
    /// # Errors
    /// [`TraceError::MissingColumn`] when no record carries a required
    /// column, [`TraceError::EmptyTrace`] when nothing survives filtering.
    pub fn normalize_records(
        &self,
        records: &[RawRecord],
    ) -> Result<NormalizedTrace, TraceError> {
        if !records.iter().any(|r| r.has_column(OBJECT_NAME_ALIASES)) {
            return Err(TraceError::MissingColumn("Object Name"));
        }
        if !records.iter().any(|r| r.has_column(STATEMENT_ALIASES)) {
            return Err(TraceError::MissingColumn("Statement"));
        }

        let rows: Vec<TraceRow> = records
            .iter()
            .filter_map(|rec| {
                let object_name = rec.get_ci(OBJECT_NAME_ALIASES)?;
                let statement = rec.get_ci(STATEMENT_ALIASES)?;
                if object_name.trim().is_empty() || statement.trim().is_empty() {
                    return None;
                }
                Some(TraceRow::new(object_name, statement))
            })
            .collect();

        self.normalize_rows(rows)
    }

    /// Normalize already-typed rows
    ///
    /// # Errors
    /// [`TraceError::EmptyTrace`] when filtering and deduplication leave
    /// zero rows.
    pub fn normalize_rows(&self, rows: Vec<TraceRow>) -> Result<NormalizedTrace, TraceError> {
        let observed_tables: BTreeSet<String> = rows
            .iter()
            .map(|r| r.object_name.to_uppercase())
            .collect();

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut canonical = Vec::new();
        for row in rows {
            if is_excluded(&row.object_name) {
                continue;
            }
            let key = (row.object_name.clone(), row.statement.clone());
            if seen.insert(key) {
                canonical.push(row);
            }
        }

        if canonical.is_empty() {
            return Err(TraceError::EmptyTrace);
        }

        tracing::debug!(
            rows = canonical.len(),
            observed = observed_tables.len(),
            "trace normalized"
        );

        Ok(NormalizedTrace {
            rows: canonical,
            observed_tables,
        })
    }
}

/// Whether an object name falls under an excluded system prefix
#[must_use]
pub fn is_excluded(object_name: &str) -> bool {
    let upper = object_name.to_uppercase();
    EXCLUDED_PREFIXES.iter().any(|p| upper.starts_with(p))
}

/// Render canonical rows as CSV text for prompt attachment
///
/// Values are always quoted; embedded quotes are doubled.
#[must_use]
pub fn render_csv(rows: &[TraceRow]) -> String {
    let mut out = String::from("Object Name,Statement\n");
    for row in rows {
        out.push_str(&format!(
            "\"{}\",\"{}\"\n",
            row.object_name.replace('"', "\"\""),
            row.statement.replace('"', "\"\"")
        ));
    }
    out
}
