//! Human-confirmation gate
//!
//! Every outbound model call passes a human checkpoint first. The gate is
//! an injected capability; the pipeline parks on it for an unbounded,
//! externally-determined duration. Declining is terminal for the request.

use async_trait::async_trait;

/// One decision produced by the gate, transient per checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationDecision {
    /// Whether the human approved the call
    pub confirmed: bool,
    /// Model chosen at the gate; empty keeps the configured default
    pub selected_model: String,
}

impl ConfirmationDecision {
    /// Approve with an explicit model choice
    #[must_use]
    pub fn approve(model: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            selected_model: model.into(),
        }
    }

    /// Decline the call
    #[inline]
    #[must_use]
    pub fn decline() -> Self {
        Self {
            confirmed: false,
            selected_model: String::new(),
        }
    }
}

/// Injected human-in-the-loop confirmation capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Present `content` under `title` and wait for the human's decision
    async fn request(&self, content: &str, title: &str) -> ConfirmationDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_constructors() {
        let approved = ConfirmationDecision::approve("gpt-4o");
        assert!(approved.confirmed);
        assert_eq!(approved.selected_model, "gpt-4o");

        let declined = ConfirmationDecision::decline();
        assert!(!declined.confirmed);
        assert!(declined.selected_model.is_empty());
    }

    #[tokio::test]
    async fn mock_gate_resolves() {
        let mut gate = MockConfirmationGate::new();
        gate.expect_request()
            .returning(|_, _| ConfirmationDecision::decline());

        let decision = gate.request("prompt", "Stage 1").await;
        assert!(!decision.confirmed);
    }
}
