//! ClaudeApiGenerator - Direct REST API implementation of the
//! text-generation collaborator.
//!
//! Calls the Claude REST API directly. Configuration comes from
//! environment variables; the engine never sees credentials.

use async_trait::async_trait;
use purposely_core::error::{PurposelyError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

use crate::context::ProfileContext;
use crate::generator::{GenerationMode, TextGenerator};

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You are the content generator for a relationship coaching app. \
You always answer with the exact JSON shape the prompt requests and nothing else.";

/// Generator implementation that talks to the Claude HTTP API.
#[derive(Clone)]
pub struct ClaudeApiGenerator {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeApiGenerator {
    /// Creates a new generator with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `ANTHROPIC_API_KEY` is required; `PURPOSELY_MODEL_NAME` overrides
    /// the default model.
    pub fn try_from_env() -> Result<Self> {
        let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
            PurposelyError::config("ANTHROPIC_API_KEY not found in environment variables")
        })?;
        let model = env::var("PURPOSELY_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn send_request(&self, body: &CreateMessageRequest) -> Result<String> {
        let response = self
            .client
            .post(BASE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| PurposelyError::upstream(format!("Claude API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Claude error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: CreateMessageResponse = response.json().await.map_err(|err| {
            PurposelyError::bad_response(format!("Failed to parse Claude response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for ClaudeApiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _context: &ProfileContext,
        mode: GenerationMode,
    ) -> Result<String> {
        // Profile context is already rendered into the prompt by the
        // prompt builders; the mode only sizes the response budget here.
        let max_tokens = match mode {
            GenerationMode::ScenarioSingle => 1024,
            GenerationMode::ScenarioBatch | GenerationMode::DailyBatch => self.max_tokens,
        };
        debug!(?mode, model = %self.model, "dispatching generation request");

        let request = CreateMessageRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            system: Some(SYSTEM_PROMPT.to_string()),
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct CreateMessageRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlockResponse>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlockResponse {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    r#type: String,
    message: String,
}

fn extract_text_response(response: CreateMessageResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find_map(|block| match block {
            ContentBlockResponse::Text { text } => Some(text),
        })
        .ok_or_else(|| {
            PurposelyError::bad_response("Claude API returned no text in the response content")
        })
}

fn map_http_error(status: StatusCode, body: String) -> PurposelyError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    PurposelyError::upstream(format!("Claude API returned {}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_prefers_structured_message() {
        let body = r#"{"error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("slow down"));
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".to_string());
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_extract_text_response() {
        let response = CreateMessageResponse {
            content: vec![ContentBlockResponse::Text {
                text: "{\"question\":\"Q\",\"answer\":\"A\"}".to_string(),
            }],
        };
        assert!(extract_text_response(response).unwrap().contains("\"Q\""));

        let empty = CreateMessageResponse { content: vec![] };
        assert_eq!(extract_text_response(empty).unwrap_err().reason(), "bad_response");
    }
}
