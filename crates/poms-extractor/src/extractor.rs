//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::examples::{ExampleStore, FewShotExample};
use crate::parser::parse_tool_call;
use crate::prompt::PromptBuilder;
use crate::schema::tool_spec;
use chrono::NaiveDate;
use poms_domain::dates;
use poms_domain::traits::LlmProvider;
use poms_domain::{Conversation, Extraction, ExtractionSchema, ToolCall, ToolSpec};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Extractor turns a query into one typed collection via a model call
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    examples: ExampleStore,
    reference_date: Option<NaiveDate>,
    model_name: String,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor with the built-in few-shot examples
    ///
    /// # Errors
    ///
    /// Fails if the configuration or the built-in examples are invalid.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let examples = ExampleStore::builtin();
        examples.validate()?;

        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
            examples,
            reference_date: None,
            model_name: "llm".to_string(),
        })
    }

    /// Replace the few-shot examples
    pub fn with_examples(mut self, examples: ExampleStore) -> Result<Self, ExtractorError> {
        examples.validate()?;
        self.examples = examples;
        Ok(self)
    }

    /// Resolve relative dates against a fixed day instead of the clock
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Create a new Extractor with a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The day relative dates resolve against
    pub fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(dates::today)
    }

    /// Extract a collection of `schema` records from `text`
    ///
    /// Returns `Ok(None)` when the model answers without calling the tool.
    pub async fn extract(
        &self,
        schema: ExtractionSchema,
        text: &str,
    ) -> Result<Option<Extraction>, ExtractorError> {
        let length = text.chars().count();
        if length > self.config.max_query_length {
            return Err(ExtractorError::QueryTooLong(length, self.config.max_query_length));
        }

        info!(
            "Starting {} extraction with model '{}', query length {}",
            schema, self.model_name, length
        );

        let today = self.today();
        let examples: &[FewShotExample] = if self.config.include_examples {
            self.examples.for_schema(schema)
        } else {
            &[]
        };

        let conversation = PromptBuilder::new(schema, text, today)
            .with_examples(examples)
            .build()?;

        debug!(
            "Prompt has {} turns ({} examples)",
            conversation.len(),
            examples.len()
        );

        let Some(call) = self.call_llm(conversation, tool_spec(schema)).await? else {
            warn!("Model returned no {} tool call", schema);
            return Ok(None);
        };

        debug!("Tool call arguments length: {} chars", call.arguments.len());

        let extraction = parse_tool_call(schema, &call, today)?;

        info!("Extraction complete: {} {} record(s)", extraction.len(), schema);

        Ok(Some(extraction))
    }

    /// Call the LLM provider
    async fn call_llm(
        &self,
        conversation: Conversation,
        tool: ToolSpec,
    ) -> Result<Option<ToolCall>, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate_structured(&conversation, &tool)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poms_llm::MockProvider;

    fn create_test_extractor(llm: MockProvider) -> Extractor<MockProvider> {
        Extractor::new(llm, ExtractorConfig::default())
            .unwrap()
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap())
    }

    #[tokio::test]
    async fn test_extract_empty_response() {
        let extractor = create_test_extractor(MockProvider::new(r#"{"orders": []}"#));

        let result = extractor.extract(ExtractionSchema::Orders, "Buy").await.unwrap();
        assert_eq!(result.map(|e| e.len()), Some(0));
    }

    #[tokio::test]
    async fn test_extract_query_too_long() {
        let llm = MockProvider::new(r#"{"orders": []}"#);
        let extractor = create_test_extractor(llm.clone());

        let long_text = "a".repeat(10_000);
        let result = extractor.extract(ExtractionSchema::Orders, &long_text).await;
        assert!(matches!(result, Err(ExtractorError::QueryTooLong(10_000, 2_000))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extract_without_examples() {
        let llm = MockProvider::new(r#"{"holdings": []}"#);
        let config = ExtractorConfig {
            include_examples: false,
            ..Default::default()
        };
        let extractor = Extractor::new(llm.clone(), config).unwrap();

        extractor.extract(ExtractionSchema::Holdings, "my holdings").await.unwrap();

        let conversation = llm.last_conversation().unwrap();
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExtractorConfig {
            max_query_length: 0,
            ..Default::default()
        };
        let result = Extractor::new(MockProvider::default(), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_reference_date_overrides_clock() {
        let extractor = create_test_extractor(MockProvider::default());
        assert_eq!(extractor.today(), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
    }
}
