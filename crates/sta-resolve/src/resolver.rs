//! Field resolution for candidate tables
//!
//! Given the tables identified in stage 1, produces a catalog of known
//! field names used to ground stage-2 prompts. Customer-namespace tables
//! are mined from observed statement text only; standard tables go through
//! the external lookup, one at a time with a politeness delay. Per-table
//! failures are skipped, never fatal.

use crate::extract::{markup_fields, statement_fields, FALLBACK_FIELDS};
use crate::lookup::TableLookup;
use indexmap::{IndexMap, IndexSet};
use sta_trace::TraceRow;
use std::sync::Arc;
use std::time::Duration;

/// Reserved prefix denoting customer (non-standard) objects
pub const CUSTOMER_PREFIX: char = 'Z';

/// Whether a table name falls in the customer namespace
#[inline]
#[must_use]
pub fn is_customer_table(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.to_ascii_uppercase() == CUSTOMER_PREFIX)
}

/// Resolved field names, one entry per table, populated incrementally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCatalog {
    entries: IndexMap<String, IndexSet<String>>,
}

impl FieldCatalog {
    /// Create an empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record resolved fields for a table
    pub fn add(&mut self, table: impl Into<String>, fields: IndexSet<String>) {
        if !fields.is_empty() {
            self.entries.entry(table.into()).or_default().extend(fields);
        }
    }

    /// Fields known for a table, if any
    #[must_use]
    pub fn fields(&self, table: &str) -> Option<&IndexSet<String>> {
        self.entries.get(table)
    }

    /// Whether nothing was resolved for any table
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tables with at least one resolved field
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deduplicated `TABLE.FIELD` tokens across all tables, in catalog order
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        let mut seen = IndexSet::new();
        for (table, fields) in &self.entries {
            for field in fields {
                seen.insert(format!("{table}.{field}"));
            }
        }
        seen.into_iter().collect()
    }
}

/// Resolution tuning knobs
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Delay between consecutive external lookups
    pub lookup_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup_delay: Duration::from_secs(1),
        }
    }
}

/// Resolves real field names for candidate tables
pub struct FieldResolver {
    lookup: Arc<dyn TableLookup>,
    config: ResolverConfig,
}

impl FieldResolver {
    /// Create a resolver over the given lookup capability
    #[must_use]
    pub fn new(lookup: Arc<dyn TableLookup>) -> Self {
        Self {
            lookup,
            config: ResolverConfig::default(),
        }
    }

    /// With custom tuning
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve fields for each candidate table, sequentially
    ///
    /// Customer-namespace tables never touch the lookup; their fields come
    /// solely from the statement text of matching trace rows. Lookup
    /// failures skip the table and continue.
    pub async fn resolve(&self, tables: &[String], rows: &[TraceRow]) -> FieldCatalog {
        let mut catalog = FieldCatalog::new();

        for table in tables {
            if is_customer_table(table) {
                let fields = self.mine_statements(table, rows);
                tracing::debug!(table = %table, fields = fields.len(), "mined customer table");
                catalog.add(table.clone(), fields);
                continue;
            }

            match self.lookup.fetch(table).await {
                Ok(markup) => {
                    let fields = markup_fields(&markup);
                    tracing::debug!(table = %table, fields = fields.len(), "lookup resolved");
                    catalog.add(table.clone(), fields);
                }
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "lookup failed, skipping table");
                }
            }

            if !self.config.lookup_delay.is_zero() {
                tokio::time::sleep(self.config.lookup_delay).await;
            }
        }

        catalog
    }

    /// Grounding context string for prompt construction
    ///
    /// Joined `TABLE.FIELD` tokens; when the catalog is empty, the fixed
    /// fallback vocabulary is substituted so stage 2 always has context.
    #[must_use]
    pub fn prompt_context(&self, catalog: &FieldCatalog) -> String {
        if catalog.is_empty() {
            tracing::info!("no fields resolved, substituting fallback vocabulary");
            return FALLBACK_FIELDS.join(", ");
        }
        catalog.tokens().join(", ")
    }

    fn mine_statements(&self, table: &str, rows: &[TraceRow]) -> IndexSet<String> {
        rows.iter()
            .filter(|r| r.object_name.eq_ignore_ascii_case(table))
            .flat_map(|r| statement_fields(&r.statement))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches; answers with canned markup or an error
    struct StubLookup {
        calls: AtomicUsize,
        response: Result<String, u16>,
    }

    impl StubLookup {
        fn ok(markup: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(markup.to_string()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(status),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TableLookup for StubLookup {
        async fn fetch(&self, _table: &str) -> Result<String, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(LookupError::Status)
        }
    }

    fn resolver(lookup: Arc<dyn TableLookup>) -> FieldResolver {
        FieldResolver::new(lookup).with_config(ResolverConfig {
            lookup_delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn customer_tables_never_hit_the_lookup() {
        let stub = Arc::new(StubLookup::ok("<td>KUNNR</td>"));
        let resolver = resolver(stub.clone());

        let rows = vec![TraceRow::new(
            "ZCUST01",
            "SELECT KUNNR, NAME1 FROM ZCUST01",
        )];
        let catalog = resolver
            .resolve(&["ZCUST01".to_string()], &rows)
            .await;

        assert_eq!(stub.calls(), 0);
        let fields = catalog.fields("ZCUST01").unwrap();
        assert!(fields.contains("KUNNR"));
        assert!(fields.contains("NAME1"));
    }

    #[tokio::test]
    async fn standard_tables_resolved_via_lookup() {
        let stub = Arc::new(StubLookup::ok("<td>BUKRS</td><td>BUTXT</td>"));
        let resolver = resolver(stub.clone());

        let catalog = resolver.resolve(&["T001".to_string()], &[]).await;

        assert_eq!(stub.calls(), 1);
        let fields = catalog.fields("T001").unwrap();
        assert!(fields.contains("BUKRS"));
        assert!(fields.contains("BUTXT"));
    }

    #[tokio::test]
    async fn lookup_failure_skips_table_and_continues() {
        let stub = Arc::new(StubLookup::failing(404));
        let resolver = resolver(stub.clone());

        let rows = vec![TraceRow::new("ZCUST01", "SELECT KUNNR FROM ZCUST01")];
        let tables = vec!["T001".to_string(), "ZCUST01".to_string()];
        let catalog = resolver.resolve(&tables, &rows).await;

        assert_eq!(stub.calls(), 1);
        assert!(catalog.fields("T001").is_none());
        assert!(catalog.fields("ZCUST01").is_some());
    }

    #[tokio::test]
    async fn empty_catalog_falls_back_to_default_vocabulary() {
        let stub = Arc::new(StubLookup::failing(500));
        let resolver = resolver(stub);

        let catalog = resolver.resolve(&["T001".to_string()], &[]).await;
        let context = resolver.prompt_context(&catalog);

        assert!(context.contains("MANDT"));
        assert!(context.contains("MATNR"));
    }

    #[test]
    fn catalog_tokens_deduplicated() {
        let mut catalog = FieldCatalog::new();
        let mut fields = IndexSet::new();
        fields.insert("KUNNR".to_string());
        catalog.add("ZCUST01", fields.clone());
        catalog.add("ZCUST01", fields);

        assert_eq!(catalog.tokens(), vec!["ZCUST01.KUNNR".to_string()]);
    }

    #[test]
    fn customer_namespace_detection() {
        assert!(is_customer_table("ZCUST01"));
        assert!(is_customer_table("zcust01"));
        assert!(!is_customer_table("T001"));
        assert!(!is_customer_table(""));
    }
}
