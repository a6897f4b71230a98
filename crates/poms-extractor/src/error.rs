//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error (transport, authentication, quota)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Query exceeds maximum length
    #[error("Query too long: {0} chars (max: {1})")]
    QueryTooLong(usize, usize),

    /// The model called a different tool than the one it was given
    #[error("Schema mismatch: expected a call to '{expected}', got '{actual}'")]
    SchemaMismatch {
        /// Tool the request was constrained to
        expected: String,
        /// Tool the model actually called
        actual: String,
    },

    /// Tool-call arguments do not conform to the schema
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// A built-in few-shot example is malformed
    #[error("Invalid few-shot example: {0}")]
    InvalidExample(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
