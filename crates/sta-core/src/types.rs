//! Core types for the analysis pipeline
//!
//! Defines the request/result shapes, restated statistics, the cooldown
//! policy and the pipeline configuration.

use serde::{Deserialize, Serialize};
use sta_trace::TraceRow;
use std::time::Duration;

/// One analysis request, owned exclusively by a single pipeline invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Name of the enterprise transaction the trace was captured from
    pub transaction_name: String,
    /// Fields the generated queries must return (free text, comma-joined)
    pub fields_to_extract: String,
    /// Filter expression requested by the user; empty means unfiltered
    pub filters: String,
    /// Business observations to honor during generation
    pub observations: String,
    /// Raw trace rows, normalized by the pipeline before use
    pub rows: Vec<TraceRow>,
}

impl AnalysisRequest {
    /// Create a request for a transaction
    #[must_use]
    pub fn new(transaction_name: impl Into<String>) -> Self {
        Self {
            transaction_name: transaction_name.into(),
            fields_to_extract: String::new(),
            filters: String::new(),
            observations: String::new(),
            rows: Vec::new(),
        }
    }

    /// With requested output fields
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields_to_extract = fields.into();
        self
    }

    /// With filter expression
    #[must_use]
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    /// With business observations
    #[must_use]
    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = observations.into();
        self
    }

    /// With trace rows
    #[must_use]
    pub fn with_rows(mut self, rows: Vec<TraceRow>) -> Self {
        self.rows = rows;
        self
    }
}

/// Statistics restated independently of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Canonical rows in the normalized trace
    pub total_rows: usize,
    /// Distinct object names in the normalized trace
    pub unique_tables: usize,
    /// Main tables as reported by the model
    pub main_tables_count: usize,
}

/// Terminal output of one pipeline invocation; immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All distinct tables the model saw in the trace
    pub unique_tables: Vec<String>,
    /// Tables judged transactionally significant
    pub main_tables: Vec<String>,
    /// Generated, ready-to-run SQL queries
    pub queries: Vec<String>,
    /// Technical explanation of the generated queries
    pub explanation: String,
    /// Table-grounding accuracy, always finite in `[0, 100]`
    ///
    /// A grounding heuristic only: it verifies that referenced tables were
    /// observed in the trace, not column names, filters or join logic.
    pub accuracy: f64,
    /// Restated statistics
    pub statistics: Statistics,
    /// Optional narrative on the transaction's behavior
    pub transaction_narrative: Option<String>,
    /// Optional narrative on the tables involved
    pub table_narrative: Option<String>,
}

/// Deliberate throttling between stage 1 and stage 2
///
/// The pauses respect provider rate limits; they are cooperative sleeps,
/// never thread blocks. Callers tune or disable them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// Sequential pauses applied in order
    pub pauses: Vec<Duration>,
}

impl CooldownPolicy {
    /// No cooldown at all
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self { pauses: Vec::new() }
    }

    /// Total cooldown duration
    #[must_use]
    pub fn total(&self) -> Duration {
        self.pauses.iter().sum()
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            pauses: vec![Duration::from_secs(20); 3],
        }
    }
}

/// Which trace table set grounds the accuracy score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBasis {
    /// Tables that survived exclusion filtering
    #[default]
    SurvivingTables,
    /// Every table observed before exclusion
    ObservedTables,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model used when a confirmation decision names none
    pub default_model: String,
    /// Token budget for the table-identification call
    pub stage1_max_tokens: u32,
    /// Temperature for the table-identification call
    pub stage1_temperature: f32,
    /// Token budget for the query-generation call
    pub stage2_max_tokens: u32,
    /// Temperature for the query-generation call
    pub stage2_temperature: f32,
    /// Throttling between the two stages
    pub cooldown: CooldownPolicy,
    /// Table set grounding the accuracy score
    pub score_basis: ScoreBasis,
}

impl PipelineConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// With a cooldown policy
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: CooldownPolicy) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// With a score basis
    #[must_use]
    pub fn with_score_basis(mut self, basis: ScoreBasis) -> Self {
        self.score_basis = basis;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_model: "gpt-4o".to_string(),
            stage1_max_tokens: 500,
            stage1_temperature: 0.1,
            stage2_max_tokens: 4000,
            stage2_temperature: 0.3,
            cooldown: CooldownPolicy::default(),
            score_basis: ScoreBasis::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_builder() {
        let request = AnalysisRequest::new("FAGLL03")
            .with_fields("Account, Profit Center")
            .with_filters("BUKRS = '1000'")
            .with_observations("split plan and actual")
            .with_rows(vec![TraceRow::new("FAGLFLEXA", "SELECT 1")]);

        assert_eq!(request.transaction_name, "FAGLL03");
        assert_eq!(request.rows.len(), 1);
    }

    #[test]
    fn default_cooldown_three_pauses() {
        let policy = CooldownPolicy::default();
        assert_eq!(policy.pauses.len(), 3);
        assert_eq!(policy.total(), Duration::from_secs(60));
        assert_eq!(CooldownPolicy::none().total(), Duration::ZERO);
    }

    #[test]
    fn default_config() {
        let config = PipelineConfig::new();
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.stage1_max_tokens, 500);
        assert_eq!(config.score_basis, ScoreBasis::SurvivingTables);
    }
}
