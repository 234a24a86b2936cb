//! Response contract enforcement
//!
//! Model replies are expected to embed exactly one JSON object, possibly
//! surrounded by prose. The parser takes the slice from the first opening
//! brace to the last closing brace and parses it under the stage contract;
//! absent list fields default to empty lists, absent strings to empty
//! strings.

use crate::error::ContractError;
use crate::types::Statistics;
use serde::Deserialize;
use sta_trace::TraceRow;
use std::collections::BTreeSet;

/// Stage-1 contract: the main tables of the transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stage1Contract {
    /// Transactionally significant tables
    #[serde(default)]
    pub tabelas_principais: Vec<String>,
}

/// Stage-2 contract: queries plus narratives
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stage2Contract {
    /// All distinct tables the model saw
    #[serde(default)]
    pub tabelas_unicas: Vec<String>,
    /// Transactionally significant tables
    #[serde(default)]
    pub tabelas_principais: Vec<String>,
    /// Generated SQL queries
    #[serde(default)]
    pub queries: Vec<String>,
    /// Technical explanation of the queries
    #[serde(default)]
    pub explicacao: String,
    /// Optional transaction narrative
    #[serde(default)]
    pub detalhamento_transacao: String,
    /// Optional table narrative
    #[serde(default)]
    pub detalhamento_tabelas: String,
}

/// Enforces the single-object output contract
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseContractParser;

impl ResponseContractParser {
    /// Locate the single top-level object literal in raw response text
    ///
    /// # Errors
    /// [`ContractError::MissingObject`] when no brace-delimited slice
    /// exists.
    pub fn extract_object(text: &str) -> Result<&str, ContractError> {
        let start = text.find('{').ok_or(ContractError::MissingObject)?;
        let end = text.rfind('}').ok_or(ContractError::MissingObject)?;
        if end < start {
            return Err(ContractError::MissingObject);
        }
        Ok(&text[start..=end])
    }

    /// Parse a stage-1 reply
    ///
    /// # Errors
    /// [`ContractError`] when no object is found or it does not parse.
    pub fn parse_stage1(text: &str) -> Result<Stage1Contract, ContractError> {
        let object = Self::extract_object(text)?;
        Ok(serde_json::from_str(object)?)
    }

    /// Parse a stage-2 reply
    ///
    /// # Errors
    /// [`ContractError`] when no object is found or it does not parse.
    pub fn parse_stage2(text: &str) -> Result<Stage2Contract, ContractError> {
        let object = Self::extract_object(text)?;
        Ok(serde_json::from_str(object)?)
    }

    /// Restate statistics independently of the model
    #[must_use]
    pub fn restate_statistics(rows: &[TraceRow], main_tables_count: usize) -> Statistics {
        let unique_tables: BTreeSet<String> = rows
            .iter()
            .map(|r| r.object_name.to_uppercase())
            .collect();
        Statistics {
            total_rows: rows.len(),
            unique_tables: unique_tables.len(),
            main_tables_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_recovered_from_surrounding_prose() {
        let text = "Sure, here is the analysis you asked for:\n\
                    {\"tabelas_principais\": [\"FAGLFLEXA\", \"T001\"]}\n\
                    Let me know if you need anything else.";
        let contract = ResponseContractParser::parse_stage1(text).unwrap();
        assert_eq!(contract.tabelas_principais, vec!["FAGLFLEXA", "T001"]);
    }

    #[test]
    fn missing_object_is_an_error() {
        let err = ResponseContractParser::parse_stage1("no json here").unwrap_err();
        assert!(matches!(err, ContractError::MissingObject));
    }

    #[test]
    fn malformed_object_is_a_parse_error() {
        let err = ResponseContractParser::parse_stage1("{\"tabelas_principais\": [").unwrap_err();
        assert!(matches!(err, ContractError::Parse(_)));
    }

    #[test]
    fn absent_fields_default() {
        let contract = ResponseContractParser::parse_stage2("{}").unwrap();
        assert!(contract.queries.is_empty());
        assert!(contract.explicacao.is_empty());
        assert!(contract.detalhamento_transacao.is_empty());
    }

    #[test]
    fn stage2_full_contract() {
        let text = r#"{
            "tabelas_unicas": ["FAGLFLEXA", "T001"],
            "tabelas_principais": ["FAGLFLEXA"],
            "queries": ["SELECT RACCT FROM FAGLFLEXA"],
            "explicacao": "totals per account",
            "detalhamento_transacao": "ledger display",
            "detalhamento_tabelas": "new GL line items"
        }"#;
        let contract = ResponseContractParser::parse_stage2(text).unwrap();
        assert_eq!(contract.queries.len(), 1);
        assert_eq!(contract.explicacao, "totals per account");
    }

    #[test]
    fn statistics_restated_from_rows() {
        let rows = vec![
            TraceRow::new("FAGLFLEXA", "SELECT 1"),
            TraceRow::new("faglflexa", "SELECT 2"),
            TraceRow::new("T001", "SELECT 3"),
        ];
        let stats = ResponseContractParser::restate_statistics(&rows, 1);
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.unique_tables, 2);
        assert_eq!(stats.main_tables_count, 1);
    }
}
