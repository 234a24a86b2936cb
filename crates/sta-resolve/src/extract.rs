//! Identifier extraction patterns
//!
//! Two sources of field names exist: the statement text of trace rows
//! (customer-namespace tables) and the markup returned by the external
//! table-reference lookup. Both are scanned with static regexes for
//! identifier-shaped tokens: leading letter/underscore, at least three
//! characters, alphanumeric/underscore body.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// SQL reserved words excluded from statement-derived field candidates
const RESERVED_WORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "ORDER", "GROUP", "BY",
    "INTO", "VALUES", "INSERT", "UPDATE", "DELETE", "SET", "JOIN", "INNER",
    "LEFT", "RIGHT", "FULL", "OUTER", "ON", "AS", "CASE", "WHEN", "THEN",
    "ELSE", "END", "SUM", "COUNT", "AVG", "MIN", "MAX", "DISTINCT", "HAVING",
    "LIKE", "BETWEEN", "NULL", "UNION", "ALL", "FOR", "WITH",
];

/// Fallback vocabulary of generic domain field names
///
/// Substituted when resolution yields no fields for any table, so stage-2
/// prompts always carry some grounding vocabulary.
pub const FALLBACK_FIELDS: &[&str] = &[
    "MANDT", "MATNR", "WERKS", "LGORT", "MEINS", "MTART", "MBRSH", "MAKTX",
    "MATKL", "BISMT", "BSTME", "ZEINR", "ZEIAR", "ZEIVR", "ZEIFO", "AESZN",
    "BLATT", "BLANZ", "FERTH", "FORMG", "GROES", "WRKST", "NORMT", "LABOR",
    "EKWSL", "BRGEW", "NTGEW", "GEWEI", "VOLUM", "VOLEH", "BEHVO", "RAUBE",
    "TEMPB",
];

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]{2,}").expect("valid regex"));

static FIELD_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").expect("valid regex"));

/// Markup extractors, applied independently and unioned
static MARKUP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // table-cell content
        r"(?i:<td[^>]*>)([A-Z_][A-Z0-9_]*)(?i:</td>)",
        // first cell of a row
        r"(?i:<tr[^>]*>\s*<td[^>]*>)([A-Z_][A-Z0-9_]*)(?i:</td>)",
        // "Field"-labeled tokens
        r"(?i:Field[^>]*>)([A-Z_][A-Z0-9_]*)<",
        // generic identifier shape
        r"[A-Z_][A-Z0-9_]{2,}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Extract candidate field names from SQL statement text
///
/// Tokens are upper-cased, reserved words dropped, order of first
/// appearance preserved.
#[must_use]
pub fn statement_fields(statement: &str) -> IndexSet<String> {
    IDENTIFIER
        .find_iter(statement)
        .map(|m| m.as_str().to_uppercase())
        .filter(|tok| !RESERVED_WORDS.contains(&tok.as_str()))
        .collect()
}

/// Extract candidate field names from lookup markup
///
/// Every pattern runs over the full document; matches are unioned and
/// filtered down to plausible field shapes (>= 3 chars, upper-case
/// identifier).
#[must_use]
pub fn markup_fields(markup: &str) -> IndexSet<String> {
    let mut fields = IndexSet::new();
    for pattern in MARKUP_PATTERNS.iter() {
        for caps in pattern.captures_iter(markup) {
            let token = caps
                .get(1)
                .map_or_else(|| caps.get(0).map(|m| m.as_str()), |m| Some(m.as_str()))
                .unwrap_or_default();
            if token.len() >= 3 && FIELD_SHAPE.is_match(token) {
                fields.insert(token.to_string());
            }
        }
    }
    fields
}
