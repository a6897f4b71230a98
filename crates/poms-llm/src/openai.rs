//! OpenAI-compatible Provider Implementation
//!
//! Talks to any server exposing `POST {endpoint}/chat/completions` with
//! function calling: the hosted OpenAI API, or a local server that speaks
//! the same protocol.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - One tool per request, forced with `tool_choice`
//! - Status codes mapped to `LlmError` variants
//! - No retries: a failed call is reported once
//!
//! # Examples
//!
//! ```no_run
//! use poms_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env(
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//!     "OPENAI_API_KEY",
//! ).unwrap();
//! ```

use crate::LlmError;
use poms_domain::traits::LlmProvider as LlmProviderTrait;
use poms_domain::{Conversation, Message, ToolCall, ToolSpec};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider for OpenAI-compatible chat completion APIs
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    temperature: f32,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    tools: Vec<WireTool<'a>>,
    tool_choice: WireToolChoice<'a>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunction,
}

#[derive(Serialize, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionSpec<'a>,
}

#[derive(Serialize)]
struct WireFunctionSpec<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Serialize)]
struct WireToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireToolName<'a>,
}

#[derive(Serialize)]
struct WireToolName<'a> {
    name: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_type(),
            function: WireFunction {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let (tool_calls, tool_call_id) = match message {
            Message::Assistant { tool_calls, .. } => {
                (tool_calls.iter().map(WireToolCall::from).collect(), None)
            }
            Message::Tool { tool_call_id, .. } => (Vec::new(), Some(tool_call_id.clone())),
            _ => (Vec::new(), None),
        };

        Self {
            role: message.role(),
            content: message.content().to_string(),
            tool_calls,
            tool_call_id,
        }
    }
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-4o-mini")
    /// - `api_key`: Bearer credential
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            temperature: 0.0,
        })
    }

    /// Create a provider whose credential is read from `api_key_env`
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingCredential` if the variable is unset or empty.
    pub fn from_env(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key_env: &str,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential(api_key_env.to_string()))?;
        Self::new(endpoint, model, api_key)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Set the sampling temperature (default 0.0)
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Name of the model requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `conversation` and force a call to `tool`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The server cannot be reached
    /// - The credential is rejected (401/403)
    /// - The model does not exist (404)
    /// - The rate limit is hit (429)
    /// - The response body is not a chat completion
    pub async fn call_tool(
        &self,
        conversation: &Conversation,
        tool: &ToolSpec,
    ) -> Result<Option<ToolCall>, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.request_body(conversation, tool);

        debug!(
            "Sending {} messages to {} (tool '{}')",
            body.messages.len(),
            self.model,
            tool.name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Authentication(error_text)
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        parse_response(&text)
    }

    fn request_body<'a>(&'a self, conversation: &Conversation, tool: &'a ToolSpec) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: conversation.messages().iter().map(WireMessage::from).collect(),
            tools: vec![WireTool {
                kind: "function",
                function: WireFunctionSpec {
                    name: &tool.name,
                    description: &tool.description,
                    parameters: &tool.parameters,
                },
            }],
            tool_choice: WireToolChoice {
                kind: "function",
                function: WireToolName { name: &tool.name },
            },
            temperature: self.temperature,
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Pull the first tool call out of a chat completion body
fn parse_response(body: &str) -> Result<Option<ToolCall>, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?;

    let call = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        });

    if call.is_none() {
        warn!(
            "Model answered without a tool call: {}",
            message.content.as_deref().unwrap_or("")
        );
    }

    Ok(call)
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate_structured(
        &self,
        conversation: &Conversation,
        tool: &ToolSpec,
    ) -> Result<Option<ToolCall>, Self::Error> {
        // Blocking wrapper for async function
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(self.call_tool(conversation, tool))
    }
}
