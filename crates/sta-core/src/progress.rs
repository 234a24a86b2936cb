//! Progress reporting
//!
//! The pipeline emits an enumerated event at every state transition.
//! Observers subscribe through [`ProgressSink`]; nothing pattern-matches
//! diagnostic text.

/// Pipeline states, linear with no backward transitions
///
/// `Failed` is reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Freshly constructed, nothing dispatched
    Init,
    /// Waiting on the human gate for the identification call
    Stage1PendingConfirm,
    /// Identification call in flight
    Stage1Calling,
    /// Resolving fields for the identified tables
    FieldsResolving,
    /// Throttling pause between stages
    Cooldown,
    /// Waiting on the human gate for the generation call
    Stage2PendingConfirm,
    /// Generation call in flight
    Stage2Calling,
    /// Enforcing the output contract and scoring
    Parsing,
    /// Terminal success
    Done,
    /// Terminal failure
    Failed,
}

impl PipelineState {
    /// Whether the state is terminal
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Observer notified on every state transition
pub trait ProgressSink: Send + Sync {
    /// Called once per transition, in order
    fn on_transition(&self, state: PipelineState);
}

/// Sink that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_transition(&self, _state: PipelineState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(PipelineState::Done.is_terminal());
        assert!(PipelineState::Failed.is_terminal());
        assert!(!PipelineState::Cooldown.is_terminal());
    }

    #[test]
    fn null_sink_accepts_events() {
        NullSink.on_transition(PipelineState::Init);
    }
}
