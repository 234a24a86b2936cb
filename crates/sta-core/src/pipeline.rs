//! The analysis pipeline
//!
//! The state machine coordinating normalization, the two-stage model
//! conversation under human confirmation, field resolution, cooldown,
//! contract parsing and grounding accuracy. States advance linearly;
//! `Failed` is reachable from everywhere; declining a gate is terminal
//! with no partial result.

use crate::confirm::{ConfirmationDecision, ConfirmationGate};
use crate::contract::ResponseContractParser;
use crate::error::AnalyzerError;
use crate::model::{ChatClient, ChatRequest};
use crate::progress::{NullSink, PipelineState, ProgressSink};
use crate::prompt;
use crate::scoring::AccuracyScorer;
use crate::types::{AnalysisRequest, AnalysisResult, PipelineConfig, ScoreBasis};
use sta_resolve::FieldResolver;
use sta_trace::{render_csv, NormalizedTrace, TraceNormalizer};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Gate title shown for the identification call
const STAGE1_TITLE: &str = "Stage 1: table identification";

/// Gate title shown for the generation call
const STAGE2_TITLE: &str = "Stage 2: query generation";

/// One pipeline instance serves one request end-to-end
pub struct AnalysisPipeline {
    config: PipelineConfig,
    gate: Arc<dyn ConfirmationGate>,
    chat: Arc<dyn ChatClient>,
    resolver: FieldResolver,
    sink: Arc<dyn ProgressSink>,
    state: PipelineState,
}

impl AnalysisPipeline {
    /// Assemble a pipeline from its injected capabilities
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        gate: Arc<dyn ConfirmationGate>,
        chat: Arc<dyn ChatClient>,
        resolver: FieldResolver,
    ) -> Self {
        Self {
            config,
            gate,
            chat,
            resolver,
            sink: Arc::new(NullSink),
            state: PipelineState::Init,
        }
    }

    /// With a progress observer
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the full analysis for one request
    ///
    /// # Errors
    /// Any [`AnalyzerError`]; every failure is terminal for the invocation
    /// and nothing is retried. The caller re-invokes the whole pipeline if
    /// it wants another attempt.
    pub async fn run(&mut self, request: AnalysisRequest) -> Result<AnalysisResult, AnalyzerError> {
        match self.execute(request).await {
            Ok(result) => {
                self.transition(PipelineState::Done);
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "pipeline failed");
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, request: AnalysisRequest) -> Result<AnalysisResult, AnalyzerError> {
        tracing::info!(transaction = %request.transaction_name, rows = request.rows.len(), "starting analysis");

        let trace = TraceNormalizer::new().normalize_rows(request.rows.clone())?;
        let csv = render_csv(&trace.rows);

        // Stage 1: table identification, gated
        self.transition(PipelineState::Stage1PendingConfirm);
        let system = prompt::stage1_system(&request.transaction_name);
        let user = prompt::stage1_user(&csv, &request.transaction_name);
        let model = self.confirm(&system, &user, STAGE1_TITLE).await?;

        self.transition(PipelineState::Stage1Calling);
        let reply = self
            .chat
            .complete(&ChatRequest {
                model,
                system,
                user,
                max_tokens: self.config.stage1_max_tokens,
                temperature: self.config.stage1_temperature,
            })
            .await?;
        let stage1 = ResponseContractParser::parse_stage1(&reply)?;
        tracing::info!(tables = stage1.tabelas_principais.len(), "stage 1 identified tables");

        // Field resolution over the identified tables
        self.transition(PipelineState::FieldsResolving);
        let catalog = self
            .resolver
            .resolve(&stage1.tabelas_principais, &trace.rows)
            .await;
        let field_context = self.resolver.prompt_context(&catalog);

        // Throttling between stages
        self.transition(PipelineState::Cooldown);
        for pause in &self.config.cooldown.pauses {
            tokio::time::sleep(*pause).await;
        }

        // Stage 2: query generation, gated
        self.transition(PipelineState::Stage2PendingConfirm);
        let system = prompt::stage2_system(&request, &field_context);
        let user = prompt::stage2_user(&csv, &request);
        let model = self.confirm(&system, &user, STAGE2_TITLE).await?;

        self.transition(PipelineState::Stage2Calling);
        let reply = self
            .chat
            .complete(&ChatRequest {
                model,
                system,
                user,
                max_tokens: self.config.stage2_max_tokens,
                temperature: self.config.stage2_temperature,
            })
            .await?;

        // Contract enforcement and scoring
        self.transition(PipelineState::Parsing);
        let contract = ResponseContractParser::parse_stage2(&reply)?;
        let trace_tables = self.scoring_tables(&trace);
        let accuracy = AccuracyScorer::score(&contract.queries, &trace_tables);
        let statistics = ResponseContractParser::restate_statistics(
            &trace.rows,
            contract.tabelas_principais.len(),
        );

        Ok(AnalysisResult {
            unique_tables: contract.tabelas_unicas,
            main_tables: contract.tabelas_principais,
            queries: contract.queries,
            explanation: contract.explicacao,
            accuracy,
            statistics,
            transaction_narrative: non_empty(contract.detalhamento_transacao),
            table_narrative: non_empty(contract.detalhamento_tabelas),
        })
    }

    /// Park on the gate; decline is terminal with no network call
    async fn confirm(
        &self,
        system: &str,
        user: &str,
        title: &str,
    ) -> Result<String, AnalyzerError> {
        let content = format!("{system}\n\n{user}");
        let decision = self.gate.request(&content, title).await;
        if !decision.confirmed {
            tracing::warn!(title, "confirmation declined");
            return Err(AnalyzerError::UserCancelled);
        }
        Ok(self.active_model(&decision))
    }

    fn active_model(&self, decision: &ConfirmationDecision) -> String {
        if decision.selected_model.trim().is_empty() {
            self.config.default_model.clone()
        } else {
            decision.selected_model.clone()
        }
    }

    fn scoring_tables(&self, trace: &NormalizedTrace) -> BTreeSet<String> {
        match self.config.score_basis {
            ScoreBasis::SurvivingTables => trace.surviving_tables(),
            ScoreBasis::ObservedTables => trace.observed_tables.clone(),
        }
    }

    fn transition(&mut self, state: PipelineState) {
        tracing::info!(from = ?self.state, to = ?state, "pipeline transition");
        self.state = state;
        self.sink.on_transition(state);
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
