//! Parse tool-call arguments into typed collections

use crate::error::ExtractorError;
use chrono::NaiveDate;
use poms_domain::{
    Extraction, ExtractionSchema, Holdings, NormalizeDates, Orders, Performances, ToolCall,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Parse a tool call into the collection for `schema`, dates resolved
///
/// The wrapper object must be well formed; individual records that fail to
/// deserialize are skipped with a warning.
pub fn parse_tool_call(
    schema: ExtractionSchema,
    call: &ToolCall,
    today: NaiveDate,
) -> Result<Extraction, ExtractorError> {
    if call.name != schema.tool_name() {
        return Err(ExtractorError::SchemaMismatch {
            expected: schema.tool_name().to_string(),
            actual: call.name.clone(),
        });
    }

    let json_str = extract_json(&call.arguments)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let object = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let items = object
        .get(schema.list_key())
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("Expected '{}' array", schema.list_key()))
        })?;

    let mut extraction: Extraction = match schema {
        ExtractionSchema::Orders => Orders {
            orders: parse_records(schema, items),
        }
        .into(),
        ExtractionSchema::Holdings => Holdings {
            holdings: parse_records(schema, items),
        }
        .into(),
        ExtractionSchema::Performances => Performances {
            performances: parse_records(schema, items),
        }
        .into(),
    };

    extraction.normalize_dates(today);
    Ok(extraction)
}

fn parse_records<T: DeserializeOwned>(schema: ExtractionSchema, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} record {}: {}", schema, idx, e);
                None
            }
        })
        .collect()
}

/// Extract JSON from arguments, handling markdown code blocks
fn extract_json(arguments: &str) -> Result<String, ExtractorError> {
    let trimmed = arguments.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
