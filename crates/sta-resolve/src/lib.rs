//! STA Resolve - field-name resolution for candidate tables
//!
//! Produces the grounding context for query generation: for each table
//! identified in stage 1, a best-effort set of real field names, via
//! statement mining (customer namespace) or external lookup (standard
//! tables), with a fixed fallback vocabulary when nothing resolves.
//!
//! # Example
//!
//! ```rust,ignore
//! use sta_resolve::{FieldResolver, HttpTableLookup};
//! use std::sync::Arc;
//!
//! # async fn example(tables: Vec<String>, rows: Vec<sta_trace::TraceRow>) {
//! let lookup = Arc::new(HttpTableLookup::new().unwrap());
//! let resolver = FieldResolver::new(lookup);
//! let catalog = resolver.resolve(&tables, &rows).await;
//! let context = resolver.prompt_context(&catalog);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod extract;
pub mod lookup;
pub mod resolver;

pub use error::LookupError;
pub use extract::{markup_fields, statement_fields, FALLBACK_FIELDS};
pub use lookup::{HttpTableLookup, TableLookup, DEFAULT_ENDPOINT};
pub use resolver::{is_customer_table, FieldCatalog, FieldResolver, ResolverConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
