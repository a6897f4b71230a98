//! Tool schemas the model is constrained to
//!
//! Each collection is offered as a single function whose arguments object is
//! `{ "<list_key>": [ <record>, ... ] }`. Every record property is nullable
//! so the model can say "not mentioned" instead of guessing.

use poms_domain::{ExtractionSchema, ToolSpec};
use serde_json::{json, Value};

/// Build the tool the model must call for `schema`
pub fn tool_spec(schema: ExtractionSchema) -> ToolSpec {
    let (description, record) = match schema {
        ExtractionSchema::Orders => ("Extracted data about orders.", order_record()),
        ExtractionSchema::Holdings => ("Extracted data about holdings.", holding_record()),
        ExtractionSchema::Performances => {
            ("Extracted data about performance.", performance_record())
        }
    };

    let list_key = schema.list_key();
    ToolSpec {
        name: schema.tool_name().to_string(),
        description: description.to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                list_key: { "type": "array", "items": record }
            },
            "required": [list_key]
        }),
    }
}

fn nullable(kind: &str, description: &str) -> Value {
    json!({ "type": [kind, "null"], "description": description })
}

fn nullable_list(description: &str) -> Value {
    json!({
        "type": ["array", "null"],
        "items": { "type": "string" },
        "description": description
    })
}

fn order_record() -> Value {
    json!({
        "type": "object",
        "description": "Information about a trading order.",
        "properties": {
            "action": {
                "type": ["string", "null"],
                "enum": ["buy", "sell", "hold", "roll", null],
                "description": "buy, sell, hold or roll"
            },
            "ticker": nullable("string", "ticker you want to trade"),
            "quantity": {
                "type": ["integer", "null"],
                "minimum": 0,
                "description": "number of units to be traded"
            },
            "weight": nullable("number", "weight of the total portfolio, usually in percentages"),
            "accounts": nullable_list("a list of accounts to buy or sell orders")
        }
    })
}

fn holding_record() -> Value {
    json!({
        "type": "object",
        "description": "A request for portfolio holdings.",
        "properties": {
            "ticker": nullable("string", "ticker or list of tickers to fetch holdings for"),
            "accounts": nullable_list("list of accounts to view holdings for; ALL for every account"),
            "start_date": nullable(
                "string",
                "start date of the holdings window; if nothing is provided, consider it as today"
            ),
            "end_date": nullable("string", "end date of the holdings window"),
            "fields": nullable_list(
                "list of fields to fetch data for. These can be exposure, yield, duration, market value, price, weight"
            )
        }
    })
}

fn performance_record() -> Value {
    json!({
        "type": "object",
        "description": "A request for portfolio performance.",
        "properties": {
            "start_date": nullable("string", "start date to evaluate the performance of accounts"),
            "end_date": nullable("string", "end date to evaluate the performance of accounts"),
            "accounts": nullable("string", "a single account or list of accounts to view performance")
        }
    })
}
