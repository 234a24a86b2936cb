//! STA Trace - canonical data model for SQL-trace exports
//!
//! Turns a raw trace export (object name + executed statement per row) into
//! a clean, deduplicated dataset:
//! - case/whitespace-tolerant header resolution,
//! - exclusion of system/metadata object prefixes,
//! - first-seen deduplication,
//! - CSV rendering for downstream prompt construction.
//!
//! # Example
//!
//! ```rust
//! use sta_trace::{TraceNormalizer, TraceRow};
//!
//! let rows = vec![
//!     TraceRow::new("ZCUST01", "SELECT KUNNR, NAME1 FROM ZCUST01"),
//!     TraceRow::new("DD02L", "SELECT * FROM DD02L"),
//! ];
//!
//! let trace = TraceNormalizer::new().normalize_rows(rows).unwrap();
//! assert_eq!(trace.rows.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod normalizer;
pub mod row;

pub use error::TraceError;
pub use normalizer::{is_excluded, render_csv, TraceNormalizer, EXCLUDED_PREFIXES};
pub use row::{NormalizedTrace, RawRecord, TraceRow};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
