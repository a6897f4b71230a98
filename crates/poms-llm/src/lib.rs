//! P.O.M.S LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `poms-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: Any OpenAI-compatible chat completions API with
//!   function calling
//!
//! # Examples
//!
//! ```
//! use poms_domain::traits::LlmProvider;
//! use poms_domain::{Conversation, Message, ToolSpec};
//! use poms_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"orders": []}"#);
//! let mut conversation = Conversation::new();
//! conversation.push(Message::User { content: "Buy 1 AAPL".into() });
//! let tool = ToolSpec {
//!     name: "Orders".into(),
//!     description: String::new(),
//!     parameters: serde_json::json!({}),
//! };
//!
//! let call = provider.generate_structured(&conversation, &tool).unwrap().unwrap();
//! assert_eq!(call.name, "Orders");
//! assert_eq!(call.arguments, r#"{"orders": []}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use poms_domain::traits::LlmProvider as LlmProviderTrait;
use poms_domain::{Conversation, ToolCall, ToolSpec};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Credential rejected by the model service
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No credential available to send
    #[error("Missing API key: environment variable {0} is not set")]
    MissingCredential(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// What the mock does for a given query
#[derive(Debug, Clone)]
enum MockReply {
    Arguments(String),
    NoCall,
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are keyed by the text of the final user turn (the query being
/// asked). Each reply is a tool call to whichever tool was requested, with
/// the configured JSON as its arguments.
///
/// # Examples
///
/// ```
/// use poms_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("Buy 1 AAPL", r#"{"orders": [{"action": "buy"}]}"#);
/// provider.add_no_call("hello");
/// provider.add_error("boom");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_conversation: Arc<Mutex<Option<Conversation>>>,
}

impl MockProvider {
    /// Create a new MockProvider answering every query with `arguments`
    pub fn new(arguments: impl Into<String>) -> Self {
        Self::with_default(MockReply::Arguments(arguments.into()))
    }

    /// Create a MockProvider whose model never calls the tool
    pub fn no_call() -> Self {
        Self::with_default(MockReply::NoCall)
    }

    /// Create a MockProvider that fails every call
    pub fn failing() -> Self {
        Self::with_default(MockReply::Error)
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            replies: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_conversation: Arc::new(Mutex::new(None)),
        }
    }

    /// Add tool-call arguments for a specific query
    pub fn add_response(&mut self, query: impl Into<String>, arguments: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.into(), MockReply::Arguments(arguments.into()));
    }

    /// Answer a specific query without calling the tool
    pub fn add_no_call(&mut self, query: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.into(), MockReply::NoCall);
    }

    /// Configure to return an error for a specific query
    pub fn add_error(&mut self, query: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.into(), MockReply::Error);
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// The conversation most recently sent to the provider
    pub fn last_conversation(&self) -> Option<Conversation> {
        self.last_conversation.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::no_call()
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate_structured(
        &self,
        conversation: &Conversation,
        tool: &ToolSpec,
    ) -> Result<Option<ToolCall>, Self::Error> {
        let call_number = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_conversation.lock().unwrap() = Some(conversation.clone());

        let query = conversation.last_user_text().unwrap_or_default();
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Arguments(arguments) => Ok(Some(ToolCall {
                id: format!("call_mock_{}", call_number),
                name: tool.name.clone(),
                arguments,
            })),
            MockReply::NoCall => Ok(None),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}
