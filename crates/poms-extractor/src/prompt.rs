//! LLM prompt engineering for structured extraction

use crate::error::ExtractorError;
use crate::examples::FewShotExample;
use chrono::NaiveDate;
use poms_domain::{Conversation, ExtractionSchema, Message, NormalizeDates, ToolCall};

/// Acknowledgment sent after every simulated tool call
pub const TOOL_ACKNOWLEDGMENT: &str = "You have correctly called this tool.";

/// Builds the conversation sent to the model for one query
pub struct PromptBuilder<'a> {
    schema: ExtractionSchema,
    query: String,
    examples: &'a [FewShotExample],
    today: NaiveDate,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(schema: ExtractionSchema, query: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            schema,
            query: query.into(),
            examples: &[],
            today,
        }
    }

    /// Add few-shot examples, rendered before the query
    pub fn with_examples(mut self, examples: &'a [FewShotExample]) -> Self {
        self.examples = examples;
        self
    }

    /// Build the complete conversation
    ///
    /// Layout: system instruction, then for each example a user turn, an
    /// assistant turn calling the tool, and a tool acknowledgment, then the
    /// query as the final user turn.
    pub fn build(&self) -> Result<Conversation, ExtractorError> {
        let mut conversation = Conversation::new();

        conversation.push(Message::System {
            content: system_instruction(self.schema),
        });

        for (idx, example) in self.examples.iter().enumerate() {
            let id = format!("call_{}_{}", self.schema.list_key(), idx);

            // Examples are stated with symbolic dates; show the model the
            // resolved form it is expected to produce
            let output = example.output.clone().normalized(self.today);

            conversation.push(Message::User {
                content: example.input.to_string(),
            });
            conversation.push(Message::Assistant {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    id: id.clone(),
                    name: self.schema.tool_name().to_string(),
                    arguments: serde_json::to_string(&output)?,
                }],
            });
            conversation.push(Message::Tool {
                content: TOOL_ACKNOWLEDGMENT.to_string(),
                tool_call_id: id,
            });
        }

        conversation.push(Message::User {
            content: self.query.clone(),
        });

        Ok(conversation)
    }
}

/// The fixed system instruction for a schema
pub fn system_instruction(schema: ExtractionSchema) -> String {
    let task = match schema {
        ExtractionSchema::Orders => "Extract order details information from the given text.",
        ExtractionSchema::Holdings => {
            "When the user says today, convert it to the system date. \
             Extract portfolio holdings information from the given text."
        }
        ExtractionSchema::Performances => {
            "Extract portfolio performance information from the given text."
        }
    };

    format!("{}\n{}\n{}", EXTRACTION_PREAMBLE, task, NULL_POLICY)
}

const EXTRACTION_PREAMBLE: &str = "You are an expert extraction algorithm. \
Only extract relevant information from the text.";

const NULL_POLICY: &str = "If you do not know the value of an attribute asked to extract, \
return null for the attribute's value.";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::examples::ExampleStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    #[test]
    fn test_conversation_without_examples() {
        let conversation = PromptBuilder::new(ExtractionSchema::Orders, "Buy 1 AAPL", today())
            .build()
            .unwrap();

        assert_eq!(conversation.len(), 2);
        assert!(matches!(&conversation.messages()[0], Message::System { content }
            if content.contains("Extract order details")));
        assert_eq!(conversation.last_user_text(), Some("Buy 1 AAPL"));
    }

    #[test]
    fn test_each_example_becomes_three_turns() {
        let store = ExampleStore::builtin();
        let examples = store.for_schema(ExtractionSchema::Orders);
        let conversation = PromptBuilder::new(ExtractionSchema::Orders, "Sell 10 TSLA", today())
            .with_examples(examples)
            .build()
            .unwrap();

        assert_eq!(conversation.len(), 2 + 3 * examples.len());

        let messages = conversation.messages();
        assert!(matches!(&messages[1], Message::User { content } if content == "Buy 250 AAPL in account capers"));
        match (&messages[2], &messages[3]) {
            (Message::Assistant { tool_calls, .. }, Message::Tool { content, tool_call_id }) => {
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, "Orders");
                assert_eq!(tool_calls[0].id, "call_orders_0");
                assert_eq!(tool_call_id, "call_orders_0");
                assert_eq!(content, TOOL_ACKNOWLEDGMENT);

                let args: serde_json::Value = serde_json::from_str(&tool_calls[0].arguments).unwrap();
                assert_eq!(args["orders"][0]["ticker"], "aapl");
                assert_eq!(args["orders"][0]["quantity"], 250);
                assert!(args["orders"][0]["weight"].is_null());
            }
            other => panic!("unexpected turns {:?}", other),
        }
        assert_eq!(conversation.last_user_text(), Some("Sell 10 TSLA"));
    }

    #[test]
    fn test_call_ids_are_unique_and_deterministic() {
        let store = ExampleStore::builtin();
        let build = || {
            PromptBuilder::new(ExtractionSchema::Holdings, "q", today())
                .with_examples(store.for_schema(ExtractionSchema::Holdings))
                .build()
                .unwrap()
        };

        let ids: Vec<_> = build()
            .messages()
            .iter()
            .filter_map(|m| match m {
                Message::Tool { tool_call_id, .. } => Some(tool_call_id.clone()),
                _ => None,
            })
            .collect();
        let unique: HashSet<&String> = ids.iter().collect();

        assert_eq!(ids.len(), 4);
        assert_eq!(unique.len(), ids.len());
        assert_eq!(build(), build());
    }

    #[test]
    fn test_example_dates_are_resolved() {
        let store = ExampleStore::builtin();
        let conversation = PromptBuilder::new(ExtractionSchema::Holdings, "q", today())
            .with_examples(store.for_schema(ExtractionSchema::Holdings))
            .build()
            .unwrap();

        let first_call = conversation
            .messages()
            .iter()
            .find_map(|m| match m {
                Message::Assistant { tool_calls, .. } => tool_calls.first().cloned(),
                _ => None,
            })
            .unwrap();
        let args: serde_json::Value = serde_json::from_str(&first_call.arguments).unwrap();
        assert_eq!(args["holdings"][0]["start_date"], "2024-05-06");
        assert_eq!(args["holdings"][0]["accounts"][0], "ABC");
    }

    #[test]
    fn test_system_instructions() {
        for schema in ExtractionSchema::ALL {
            let instruction = system_instruction(schema);
            assert!(instruction.starts_with("You are an expert extraction algorithm."));
            assert!(instruction.contains("return null for the attribute's value"));
        }
        assert!(system_instruction(ExtractionSchema::Holdings).contains("system date"));
    }
}
