//! Table-grounding accuracy
//!
//! Statically extracts table references from generated SQL text and scores
//! how many are grounded in the observed trace table set. A heuristic
//! only: it says nothing about column names, filter correctness or join
//! logic.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Clause extractors applied independently per query
static CLAUSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // source clause
        r"(?i)FROM\s+([A-Za-z_][A-Za-z0-9_]*)",
        // join clause, any qualifier
        r"(?i)(?:INNER\s+|LEFT\s+|RIGHT\s+|FULL\s+|OUTER\s+|CROSS\s+)*JOIN\s+([A-Za-z_][A-Za-z0-9_]*)",
        // update target
        r"(?i)UPDATE\s+([A-Za-z_][A-Za-z0-9_]*)",
        // delete target
        r"(?i)DELETE\s+FROM\s+([A-Za-z_][A-Za-z0-9_]*)",
        // insert target
        r"(?i)INSERT\s+INTO\s+([A-Za-z_][A-Za-z0-9_]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Deterministic grounding scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyScorer;

impl AccuracyScorer {
    /// Table names referenced by one query, upper-cased and deduplicated
    #[must_use]
    pub fn query_tables(query: &str) -> IndexSet<String> {
        let mut tables = IndexSet::new();
        for pattern in CLAUSE_PATTERNS.iter() {
            for caps in pattern.captures_iter(query) {
                if let Some(name) = caps.get(1) {
                    tables.insert(name.as_str().to_uppercase());
                }
            }
        }
        tables
    }

    /// Grounding accuracy over a set of queries, in `[0, 100]`
    ///
    /// `trace_tables` must be upper-cased. A query contributing zero
    /// extractable references adds nothing to either total (policy choice:
    /// abstention, not failure). Zero total references scores `0`.
    #[must_use]
    pub fn score(queries: &[String], trace_tables: &BTreeSet<String>) -> f64 {
        let mut extracted = 0usize;
        let mut grounded = 0usize;

        for query in queries {
            let tables = Self::query_tables(query);
            for table in &tables {
                extracted += 1;
                if trace_tables.contains(table) {
                    grounded += 1;
                }
            }
            tracing::debug!(
                query_tables = tables.len(),
                "scored query references"
            );
        }

        if extracted == 0 {
            return 0.0;
        }

        #[allow(clippy::cast_precision_loss)]
        let accuracy = (grounded as f64 / extracted as f64) * 100.0;
        tracing::info!(grounded, extracted, accuracy, "grounding accuracy computed");
        accuracy
    }
}
