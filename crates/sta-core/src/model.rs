//! Generative-model client
//!
//! A system+user message pair goes out; the model's raw text comes back.
//! Model families differ in parameter shape: reasoning families take their
//! token budget under a different key and reject an explicit temperature.
//! That shape lives in a data-driven lookup so new families extend cleanly.

use crate::error::{AnalyzerError, TransportError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Default chat-completions endpoint
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Parameter shape for one model family
#[derive(Debug, Clone, Copy)]
struct FamilyParams {
    /// Model-id prefix selecting this family
    prefix: &'static str,
    /// JSON key carrying the token budget
    token_limit_key: &'static str,
    /// Whether an explicit temperature is sent at all
    include_temperature: bool,
}

/// Reasoning families omit temperature, forcing default behavior
const MODEL_FAMILIES: &[FamilyParams] = &[
    FamilyParams {
        prefix: "o1",
        token_limit_key: "max_completion_tokens",
        include_temperature: false,
    },
    FamilyParams {
        prefix: "o3",
        token_limit_key: "max_completion_tokens",
        include_temperature: false,
    },
    FamilyParams {
        prefix: "o4",
        token_limit_key: "max_completion_tokens",
        include_temperature: false,
    },
];

/// Request parameters derived from a model id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    /// The model identifier
    pub model_id: String,
    /// JSON key carrying the token budget for this family
    pub token_limit_key: &'static str,
    /// Whether the request includes a temperature value
    pub include_temperature: bool,
}

impl ModelSelection {
    /// Derive the parameter shape for a model id
    #[must_use]
    pub fn for_model(model_id: &str) -> Self {
        let family = MODEL_FAMILIES
            .iter()
            .find(|f| model_id.starts_with(f.prefix));
        match family {
            Some(f) => Self {
                model_id: model_id.to_string(),
                token_limit_key: f.token_limit_key,
                include_temperature: f.include_temperature,
            },
            None => Self {
                model_id: model_id.to_string(),
                token_limit_key: "max_tokens",
                include_temperature: true,
            },
        }
    }
}

/// One system+user exchange with the provider
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Target model id
    pub model: String,
    /// System message content
    pub system: String,
    /// User message content
    pub user: String,
    /// Token budget
    pub max_tokens: u32,
    /// Requested temperature; dropped for families that reject it
    pub temperature: f32,
}

impl ChatRequest {
    /// Render the provider request body under the family parameter shape
    #[must_use]
    pub fn to_body(&self) -> Value {
        let selection = ModelSelection::for_model(&self.model);
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system },
                { "role": "user", "content": self.user },
            ],
        });
        body[selection.token_limit_key] = json!(self.max_tokens);
        if selection.include_temperature {
            body["temperature"] = json!(self.temperature);
        }
        body
    }
}

/// Capability for completing a chat request with raw model text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the exchange and return the model's raw text
    ///
    /// # Errors
    /// [`TransportError`] classified by provider status; never retried.
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError>;
}

/// Chat client for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiChatClient {
    /// Create a client with the given credential
    ///
    /// # Errors
    /// [`AnalyzerError::Configuration`] when the credential is blank or the
    /// HTTP client cannot be built.
    pub fn new(api_key: &str) -> Result<Self, AnalyzerError> {
        Self::with_endpoint(api_key, DEFAULT_CHAT_ENDPOINT)
    }

    /// Create a client against a custom endpoint
    ///
    /// # Errors
    /// [`AnalyzerError::Configuration`] when the credential is blank or the
    /// HTTP client cannot be built.
    pub fn with_endpoint(
        api_key: &str,
        endpoint: impl Into<String>,
    ) -> Result<Self, AnalyzerError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AnalyzerError::Configuration(
                "API key not configured".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AnalyzerError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError> {
        tracing::debug!(model = %request.model, "dispatching chat request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(status.as_u16(), detail));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Other(e.to_string()))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TransportError::Other("no response content received".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reasoning_families_omit_temperature() {
        let selection = ModelSelection::for_model("o1-preview");
        assert_eq!(selection.token_limit_key, "max_completion_tokens");
        assert!(!selection.include_temperature);

        let selection = ModelSelection::for_model("o3-mini");
        assert!(!selection.include_temperature);
    }

    #[test]
    fn default_family_includes_temperature() {
        let selection = ModelSelection::for_model("gpt-4o");
        assert_eq!(selection.token_limit_key, "max_tokens");
        assert!(selection.include_temperature);
    }

    #[test]
    fn body_shape_follows_family() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            system: "sys".to_string(),
            user: "usr".to_string(),
            max_tokens: 500,
            temperature: 0.1,
        };
        let body = request.to_body();
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);

        let request = ChatRequest {
            model: "o1-preview".to_string(),
            ..request
        };
        let body = request.to_body();
        assert_eq!(body["max_completion_tokens"], 500);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn blank_api_key_rejected() {
        assert!(OpenAiChatClient::new("  ").is_err());
        assert!(OpenAiChatClient::new("sk-test").is_ok());
    }
}
