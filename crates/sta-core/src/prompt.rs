//! Prompt construction
//!
//! Builds the system/user message pairs for the two pipeline stages and
//! the document-brief extraction. Every prompt pins the reply to a single
//! JSON object with fixed keys, no markdown, no surrounding text.

use crate::types::AnalysisRequest;

/// Shared JSON-only discipline appended to every system prompt
const JSON_ONLY_RULE: &str = "ATTENTION: the reply MUST be PURE JSON, no code fences, no markdown.\n\
ALWAYS answer with valid JSON, starting at '{' and ending at '}', with NO text outside the JSON.";

/// System prompt for stage 1: table identification
#[must_use]
pub fn stage1_system(transaction: &str) -> String {
    format!(
        "You are an SAP specialist with deep knowledge of transaction {transaction} and of the \
tables, views and data structures it uses.\n\
You analyze CSV files containing SQL query traces captured from that transaction via ST05. \
Analyze the CSV file and return ONLY the main tables in the JSON format:\n\
{{\n  \"tabelas_principais\": [\"list\", \"of\", \"the\", \"most\", \"important\", \"tables\"]\n}}\n\
{JSON_ONLY_RULE}"
    )
}

/// User prompt for stage 1
#[must_use]
pub fn stage1_user(csv: &str, transaction: &str) -> String {
    format!(
        "CSV file data:\n\n{csv}\n\nAnalyze it and return only the main tables of transaction {transaction}."
    )
}

/// System prompt for stage 2: query generation
///
/// Embeds the resolved field catalog and the user's fields, filters and
/// observations. An empty filter defaults to `1=1`. One query per grouping
/// dimension, never two grouping fields combined.
#[must_use]
pub fn stage2_system(request: &AnalysisRequest, field_context: &str) -> String {
    let filters = if request.filters.trim().is_empty() {
        "1=1"
    } else {
        request.filters.trim()
    };
    format!(
        "You are an SAP specialist with deep knowledge of transaction {transaction} and of the \
tables, views and data structures it uses.\n\
You analyze CSV files containing SQL query traces captured from that transaction via ST05.\n\n\
The CSV file has the following columns:\n\
- Object Name: name of the accessed objects/tables\n\
- Statement: executed SQL query\n\n\
Your task is to analyze the attached file and:\n\
1. Extract all unique tables from the \"Object Name\" column\n\
2. Identify the main tables, based on your knowledge of the database and of the tables used by transaction {transaction}\n\
3. Use your knowledge of the transaction's labels to convert the fields {fields} to their technical database names where needed\n\
4. Generate real, complete, ready-to-run queries returning the fields {fields}, with the filter {filters}, honoring the observations: {observations}\n\
5. When grouping is requested, ALWAYS generate one query per grouping field; each grouping produces a different total. NEVER combine two grouping fields in the same query\n\
6. Produce a technical explanation of the transaction, of each generated query and of the most used table\n\n\
{json_rule}\n\
ALWAYS build the queries using the real available fields: {field_context}",
        transaction = request.transaction_name,
        fields = request.fields_to_extract,
        filters = filters,
        observations = request.observations,
        json_rule = JSON_ONLY_RULE,
        field_context = field_context,
    )
}

/// User prompt for stage 2
#[must_use]
pub fn stage2_user(csv: &str, request: &AnalysisRequest) -> String {
    format!(
        "CSV file data:\n\n{csv}\n\n\
Analyze the attached CSV trace of transaction {transaction}.\n\n\
ALWAYS answer in the JSON format:\n\
{{\n\
  \"tabelas_unicas\": [\"list\", \"of\", \"tables\", \"found\"],\n\
  \"tabelas_principais\": [\"list\", \"of\", \"the\", \"most\", \"important\", \"tables\"],\n\
  \"queries\": [\"query1\", \"query2\", \"query3\"],\n\
  \"explicacao\": \"Brief technical explanation of each query\",\n\
  \"detalhamento_transacao\": \"Technical rundown of the transaction's behavior\",\n\
  \"detalhamento_tabelas\": \"Technical rundown of the tables used in the queries\"\n\
}}\n\
ALWAYS answer with valid JSON, starting at '{{' and ending at '}}'.",
        transaction = request.transaction_name,
    )
}

/// System prompt for document-brief extraction
#[must_use]
pub fn brief_system() -> String {
    format!(
        "You are a specialist in SAP and document analysis. Analyze the text extracted from a \
requirements document, pulling out the transaction name, the fields to extract and the filters \
used. Based on the document content, which may include screenshots of the transaction's output, \
write down the important observations about business rules, groupings, totals and viewing \
dimensions.\n\n\
ALWAYS answer in valid JSON:\n\
{{\n\
  \"transacao\": \"transaction name\",\n\
  \"campos\": [\"list\", \"of\", \"fields\", \"to\", \"extract\"],\n\
  \"filtros\": [\"filters\"],\n\
  \"observacao\": \"Brief note on totals, groupings or transaction-specific business rules\"\n\
}}\n\
{JSON_ONLY_RULE}"
    )
}

/// User prompt for document-brief extraction
#[must_use]
pub fn brief_user(document_text: &str) -> String {
    format!(
        "Analyze the following text extracted from a requirements document and pull out the \
requested information:\n\n{document_text}\n\n\
Extract the SAP transaction name, the fields to be extracted, the filters used and the \
important business-rule observations."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage1_prompts_pin_json_contract() {
        let system = stage1_system("FAGLL03");
        assert!(system.contains("tabelas_principais"));
        assert!(system.contains("PURE JSON"));

        let user = stage1_user("Object Name,Statement\n", "FAGLL03");
        assert!(user.contains("FAGLL03"));
    }

    #[test]
    fn stage2_empty_filter_defaults_to_tautology() {
        let request = AnalysisRequest::new("FAGLL03").with_fields("Account");
        let system = stage2_system(&request, "FAGLFLEXA.RACCT");
        assert!(system.contains("1=1"));
        assert!(system.contains("FAGLFLEXA.RACCT"));
        assert!(system.contains("NEVER combine two grouping fields"));
    }

    #[test]
    fn stage2_explicit_filter_kept() {
        let request = AnalysisRequest::new("FAGLL03").with_filters("BUKRS = '1000'");
        let system = stage2_system(&request, "");
        assert!(system.contains("BUKRS = '1000'"));
        assert!(!system.contains("1=1"));
    }

    #[test]
    fn stage2_user_names_all_contract_keys() {
        let request = AnalysisRequest::new("VA03");
        let user = stage2_user("", &request);
        for key in [
            "tabelas_unicas",
            "tabelas_principais",
            "queries",
            "explicacao",
            "detalhamento_transacao",
            "detalhamento_tabelas",
        ] {
            assert!(user.contains(key), "missing key {key}");
        }
    }

    #[test]
    fn brief_prompts_name_contract_keys() {
        let system = brief_system();
        assert!(system.contains("transacao"));
        assert!(system.contains("campos"));
        assert!(system.contains("filtros"));
        assert!(system.contains("observacao"));
        assert!(brief_user("some text").contains("some text"));
    }
}
