//! Error types for trace normalization

/// Validation errors raised while turning a raw export into canonical rows
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// A required column could not be resolved in the export headers
    #[error("required column missing: {0}")]
    MissingColumn(&'static str),

    /// Filtering and deduplication left nothing to analyze
    #[error("no valid trace rows remain after filtering")]
    EmptyTrace,
}
