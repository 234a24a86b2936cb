//! STA Core - trace-grounded query generation pipeline
//!
//! Turns a normalized SQL trace into verified, ready-to-run queries plus a
//! trust score:
//! - stage 1 identifies the transaction's main tables,
//! - real field names are resolved for those tables,
//! - stage 2 generates queries grounded in the resolved fields,
//! - the reply is held to a strict single-object contract,
//! - a deterministic score measures table grounding against the trace.
//!
//! Each model call passes a human-confirmation gate first, and the
//! pipeline emits an enumerated progress event at every state transition.
//!
//! # Example
//!
//! ```rust,ignore
//! use sta_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(gate: Arc<dyn ConfirmationGate>, rows: Vec<sta_trace::TraceRow>) -> Result<(), AnalyzerError> {
//! let chat = Arc::new(OpenAiChatClient::new("sk-...")?);
//! let lookup = Arc::new(sta_resolve::HttpTableLookup::new().unwrap());
//! let resolver = sta_resolve::FieldResolver::new(lookup);
//!
//! let mut pipeline = AnalysisPipeline::new(PipelineConfig::new(), gate, chat, resolver);
//! let result = pipeline
//!     .run(AnalysisRequest::new("FAGLL03").with_rows(rows))
//!     .await?;
//!
//! println!("accuracy: {:.1}%", result.accuracy);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod brief;
pub mod confirm;
pub mod contract;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod scoring;
pub mod types;

pub use brief::{BriefExtractor, DocumentBrief};
pub use confirm::{ConfirmationDecision, ConfirmationGate};
pub use contract::{ResponseContractParser, Stage1Contract, Stage2Contract};
pub use error::{AnalyzerError, ContractError, TransportError};
pub use model::{ChatClient, ChatRequest, ModelSelection, OpenAiChatClient};
pub use pipeline::AnalysisPipeline;
pub use progress::{NullSink, PipelineState, ProgressSink};
pub use scoring::AccuracyScorer;
pub use types::{
    AnalysisRequest, AnalysisResult, CooldownPolicy, PipelineConfig, ScoreBasis, Statistics,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the analysis pipeline
    pub use crate::{
        AnalysisPipeline, AnalysisRequest, AnalysisResult, AnalyzerError, ChatClient,
        ConfirmationDecision, ConfirmationGate, CooldownPolicy, OpenAiChatClient, PipelineConfig,
        PipelineState, ProgressSink,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
