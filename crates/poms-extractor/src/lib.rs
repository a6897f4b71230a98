//! P.O.M.S Extractor
//!
//! Routes free-text portfolio queries to a typed extraction pipeline backed by
//! a schema-constrained model call.
//!
//! # Architecture
//!
//! ```text
//! Text → QueryRouter → PromptBuilder (+ ExampleStore) → LlmProvider → parser → Extraction
//! ```
//!
//! - **Routing**: an `IntentClassifier` picks orders, holdings or performance
//! - **Prompting**: system instruction, few-shot tool calls, then the query
//! - **Invocation**: the provider must answer by calling the schema's tool
//! - **Parsing**: arguments become typed records with dates resolved
//!
//! # Example Usage
//!
//! ```no_run
//! use poms_extractor::{Extractor, ExtractorConfig, QueryRouter};
//! use poms_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OpenAiProvider::from_env("https://api.openai.com/v1", "gpt-4o-mini", "OPENAI_API_KEY")?;
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//! let router = QueryRouter::new(extractor);
//!
//! match router.route("Buy 250 AAPL in account capers").await? {
//!     Some(extraction) => println!("{}", serde_json::to_string_pretty(&extraction)?),
//!     None => println!("Please rephrase"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod examples;
mod extractor;
mod parser;
mod prompt;
mod router;
mod schema;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use examples::{ExampleStore, FewShotExample, EXAMPLE_QUERIES};
pub use extractor::Extractor;
pub use parser::parse_tool_call;
pub use prompt::{system_instruction, PromptBuilder, TOOL_ACKNOWLEDGMENT};
pub use router::QueryRouter;
pub use schema::tool_spec;
