//! Error types for the analysis pipeline
//!
//! The taxonomy is deliberately flat: every failure is terminal for the
//! invocation and surfaces as one descriptive error. No layer retries;
//! resilience belongs to the caller.

/// Transport failures from the generative-model provider
///
/// Classified from the HTTP status of the provider response. Each class
/// maps to a distinct human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Authentication failure (401)
    #[error("invalid API key; check the configured credential")]
    Auth,

    /// Rate-limit failure (429)
    #[error("request limit exceeded; try again in a few minutes")]
    RateLimit,

    /// Malformed-request failure (400)
    #[error("request rejected by provider: {0}")]
    BadRequest(String),

    /// Unclassified provider or network failure
    #[error("provider error: {0}")]
    Other(String),
}

impl TransportError {
    /// Classify a provider HTTP status
    #[must_use]
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        match status {
            401 => Self::Auth,
            429 => Self::RateLimit,
            400 => Self::BadRequest(detail.into()),
            _ => Self::Other(detail.into()),
        }
    }
}

/// Failures enforcing the structured-output contract
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// No top-level object literal found in the response text
    #[error("response contains no object literal")]
    MissingObject,

    /// The object literal did not parse under the expected shape
    #[error("contract parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Missing or invalid credential/configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad input shape or empty dataset
    #[error("validation error: {0}")]
    Validation(#[from] sta_trace::TraceError),

    /// Unparsable model output
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Provider transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The human declined a confirmation gate
    #[error("analysis cancelled by user")]
    UserCancelled,
}

impl AnalyzerError {
    /// Whether the failure came from the user declining a gate
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    /// Whether the failure came from provider transport
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(matches!(
            TransportError::from_status(401, ""),
            TransportError::Auth
        ));
        assert!(matches!(
            TransportError::from_status(429, ""),
            TransportError::RateLimit
        ));
        assert!(matches!(
            TransportError::from_status(400, "bad body"),
            TransportError::BadRequest(_)
        ));
        assert!(matches!(
            TransportError::from_status(503, "down"),
            TransportError::Other(_)
        ));
    }

    #[test]
    fn analyzer_error_predicates() {
        assert!(AnalyzerError::UserCancelled.is_cancelled());
        assert!(AnalyzerError::Transport(TransportError::Auth).is_transport());
        assert!(!AnalyzerError::UserCancelled.is_transport());
    }

    #[test]
    fn transport_messages_are_distinct() {
        let auth = TransportError::Auth.to_string();
        let rate = TransportError::RateLimit.to_string();
        assert_ne!(auth, rate);
        assert!(auth.contains("API key"));
        assert!(rate.contains("limit"));
    }

    #[test]
    fn contract_error_carries_detail() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ContractError::Parse(parse_err);
        assert!(err.to_string().contains("contract parse failed"));
    }
}
