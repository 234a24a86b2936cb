//! Document-brief extraction
//!
//! Given free text already extracted from a requirements document, one
//! model call pulls out the transaction name, the fields to extract, the
//! filters and the business observations, producing a draft request the
//! caller completes with trace rows. The text extraction itself is an
//! external collaborator.

use crate::contract::ResponseContractParser;
use crate::error::AnalyzerError;
use crate::model::{ChatClient, ChatRequest};
use crate::prompt;
use crate::types::AnalysisRequest;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
struct BriefContract {
    #[serde(default)]
    transacao: String,
    #[serde(default)]
    campos: Vec<String>,
    #[serde(default)]
    filtros: Vec<String>,
    #[serde(default)]
    observacao: String,
}

/// The structured brief recovered from a requirements document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBrief {
    /// Transaction named in the document
    pub transaction: String,
    /// Fields the user wants extracted
    pub fields: Vec<String>,
    /// Filters named in the document
    pub filters: Vec<String>,
    /// Business-rule observations
    pub observation: String,
}

impl DocumentBrief {
    /// Turn the brief into a draft request, without trace rows
    #[must_use]
    pub fn into_request(self) -> AnalysisRequest {
        AnalysisRequest::new(self.transaction)
            .with_fields(self.fields.join(", "))
            .with_filters(self.filters.join(", "))
            .with_observations(self.observation)
    }
}

/// Extracts a [`DocumentBrief`] through one model call
pub struct BriefExtractor {
    chat: Arc<dyn ChatClient>,
    model: String,
}

impl BriefExtractor {
    /// Token budget for the extraction call
    const MAX_TOKENS: u32 = 2000;

    /// Temperature for the extraction call
    const TEMPERATURE: f32 = 0.2;

    /// Create an extractor over a chat capability
    #[must_use]
    pub fn new(chat: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    /// Extract the brief from document text
    ///
    /// # Errors
    /// [`AnalyzerError::Transport`] on provider failure,
    /// [`AnalyzerError::Contract`] when the reply carries no parsable
    /// object.
    pub async fn extract(&self, document_text: &str) -> Result<DocumentBrief, AnalyzerError> {
        tracing::info!(chars = document_text.len(), "extracting document brief");

        let reply = self
            .chat
            .complete(&ChatRequest {
                model: self.model.clone(),
                system: prompt::brief_system(),
                user: prompt::brief_user(document_text),
                max_tokens: Self::MAX_TOKENS,
                temperature: Self::TEMPERATURE,
            })
            .await?;

        let object = ResponseContractParser::extract_object(&reply)?;
        let contract: BriefContract =
            serde_json::from_str(object).map_err(crate::error::ContractError::Parse)?;

        Ok(DocumentBrief {
            transaction: contract.transacao,
            fields: contract.campos,
            filters: contract.filtros,
            observation: contract.observacao,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockChatClient;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn brief_extracted_and_mapped() {
        let mut chat = MockChatClient::new();
        chat.expect_complete().times(1).returning(|_| {
            Ok(r#"Extracted data follows.
{"transacao": "FAGLL03", "campos": ["Account", "Profit Center"], "filtros": ["BUKRS = '1000'"], "observacao": "split plan and actual"}"#
                .to_string())
        });

        let extractor = BriefExtractor::new(Arc::new(chat), "gpt-4o");
        let brief = extractor.extract("some document text").await.unwrap();

        assert_eq!(brief.transaction, "FAGLL03");
        let request = brief.into_request();
        assert_eq!(request.fields_to_extract, "Account, Profit Center");
        assert_eq!(request.filters, "BUKRS = '1000'");
        assert_eq!(request.observations, "split plan and actual");
    }

    #[tokio::test]
    async fn unparsable_reply_is_a_contract_error() {
        let mut chat = MockChatClient::new();
        chat.expect_complete()
            .returning(|_| Ok("nothing structured".to_string()));

        let extractor = BriefExtractor::new(Arc::new(chat), "gpt-4o");
        let err = extractor.extract("text").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Contract(_)));
    }
}
