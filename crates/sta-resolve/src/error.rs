//! Error types for field resolution
//!
//! Lookup failures are soft: the resolver logs them and skips the table.

/// Errors from a single external table lookup
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Request could not be sent or the response body not read
    #[error("lookup request failed: {0}")]
    Request(String),

    /// Endpoint answered with a non-success status
    #[error("lookup returned status {0}")]
    Status(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_display() {
        assert!(LookupError::Status(404).to_string().contains("404"));
        assert!(LookupError::Request("timeout".into())
            .to_string()
            .contains("timeout"));
    }
}
