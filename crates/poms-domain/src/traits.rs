//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::conversation::{Conversation, ToolCall, ToolSpec};
use crate::intent::Intent;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (poms-llm). A provider is handed
/// to the extractor when it is built; nothing reaches for a global client.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send `conversation` and require the model to answer by calling `tool`.
    ///
    /// Returns `Ok(None)` when the model answers without calling the tool.
    fn generate_structured(
        &self,
        conversation: &Conversation,
        tool: &ToolSpec,
    ) -> Result<Option<ToolCall>, Self::Error>;
}

/// Trait for deciding which pipeline a query belongs to
///
/// Implemented in this crate by [`crate::KeywordClassifier`].
pub trait IntentClassifier {
    /// Classify raw query text
    fn classify(&self, text: &str) -> Intent;
}
