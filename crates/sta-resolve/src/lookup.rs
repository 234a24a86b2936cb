//! External table-reference lookup
//!
//! Standard (non-customer) tables are resolved against a public reference
//! site. The lookup sits behind a trait so the resolver can be exercised
//! without network access.

use crate::error::LookupError;
use async_trait::async_trait;
use std::time::Duration;

/// Default endpoint template; `{table}` is replaced by the table name
pub const DEFAULT_ENDPOINT: &str = "https://leanx.eu/en/sap/table/{table}";

/// Descriptive client identity sent with every lookup
pub const USER_AGENT: &str = "sta-resolve/0.1 (SQL trace field resolver)";

/// Request timeout for a single lookup
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability for fetching reference markup for a table name
#[async_trait]
pub trait TableLookup: Send + Sync {
    /// Fetch the reference document for `table`
    ///
    /// # Errors
    /// [`LookupError`] on transport failure or non-success status. Callers
    /// treat any error as a soft skip for that table.
    async fn fetch(&self, table: &str) -> Result<String, LookupError>;
}

/// HTTP lookup against a templated reference endpoint
#[derive(Debug, Clone)]
pub struct HttpTableLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTableLookup {
    /// Create a lookup against the default endpoint
    ///
    /// # Errors
    /// [`LookupError::Request`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a lookup against a custom endpoint template
    ///
    /// # Errors
    /// [`LookupError::Request`] if the HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Resolved URL for a table name
    #[must_use]
    pub fn url_for(&self, table: &str) -> String {
        self.endpoint.replace("{table}", table)
    }
}

#[async_trait]
impl TableLookup for HttpTableLookup {
    async fn fetch(&self, table: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(self.url_for(table))
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_substitutes_table_name() {
        let lookup = HttpTableLookup::new().unwrap();
        assert_eq!(
            lookup.url_for("T001"),
            "https://leanx.eu/en/sap/table/T001"
        );
    }

    #[test]
    fn custom_endpoint_template() {
        let lookup = HttpTableLookup::with_endpoint("http://localhost/ref/{table}").unwrap();
        assert_eq!(lookup.url_for("MARA"), "http://localhost/ref/MARA");
    }
}
