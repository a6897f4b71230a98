//! Order module - trading instructions extracted from text

use crate::dates::NormalizeDates;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// What an order asks the desk to do
///
/// Deserialization is case-insensitive because models are not consistent
/// about casing; serialization is always lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OrderAction {
    /// Open or add to a position
    Buy,
    /// Reduce or close a position
    Sell,
    /// Keep the position unchanged
    Hold,
    /// Roll the position into the next contract
    Roll,
}

impl OrderAction {
    /// Get the action name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Buy => "buy",
            OrderAction::Sell => "sell",
            OrderAction::Hold => "hold",
            OrderAction::Roll => "roll",
        }
    }

    /// Parse an action from a string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Some(OrderAction::Buy),
            "sell" => Some(OrderAction::Sell),
            "hold" => Some(OrderAction::Hold),
            "roll" => Some(OrderAction::Roll),
            _ => None,
        }
    }
}

impl std::str::FromStr for OrderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid order action: {}", s))
    }
}

impl TryFrom<String> for OrderAction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information about a trading order
///
/// Every field is optional: the model returns null for anything the text
/// does not mention. `quantity` and `weight` are alternative sizings and
/// may both be absent. A missing `accounts` list means all accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// buy, sell, hold or roll; anything else is read as unknown
    #[serde(default, deserialize_with = "lenient_action")]
    pub action: Option<OrderAction>,

    /// Ticker to trade
    #[serde(default)]
    pub ticker: Option<String>,

    /// Number of units to trade
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<u64>,

    /// Weight of the total portfolio, in percent
    #[serde(default)]
    pub weight: Option<f64>,

    /// Accounts the order applies to
    #[serde(default)]
    pub accounts: Option<Vec<String>>,
}

impl Order {
    /// Whether the order carries an action; orders without one are noise
    pub fn is_actionable(&self) -> bool {
        self.action.is_some()
    }

    /// Whether the order targets every account
    pub fn applies_to_all_accounts(&self) -> bool {
        self.accounts.as_ref().map_or(true, |a| a.is_empty())
    }
}

/// An unrecognized action leaves the rest of the order usable
fn lenient_action<'de, D>(deserializer: D) -> Result<Option<OrderAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let action = OrderAction::parse(&value);
        if action.is_none() {
            warn!("Ignoring unknown order action '{}'", value);
        }
        action
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Whole(u64),
    Float(f64),
}

/// Models often write whole numbers as floats (`250.0`)
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawQuantity>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawQuantity::Whole(n)) => Ok(Some(n)),
        Some(RawQuantity::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(Some(f as u64))
        }
        Some(RawQuantity::Float(f)) => Err(D::Error::custom(format!(
            "quantity must be a non-negative whole number, got {}",
            f
        ))),
    }
}

/// Extracted data about orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orders {
    /// Orders in the order they were mentioned
    pub orders: Vec<Order>,
}

// Orders carry no dates; implemented so every collection normalizes uniformly
impl NormalizeDates for Orders {
    fn normalize_dates(&mut self, _today: NaiveDate) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_parse_ignores_case() {
        assert_eq!(OrderAction::parse("BUY"), Some(OrderAction::Buy));
        assert_eq!(OrderAction::parse(" Sell "), Some(OrderAction::Sell));
        assert_eq!(OrderAction::parse("roll"), Some(OrderAction::Roll));
        assert_eq!(OrderAction::parse("short"), None);
    }

    #[test]
    fn test_order_deserializes_nulls_and_missing_fields() {
        let order: Order = serde_json::from_value(json!({
            "action": "Buy",
            "ticker": "aapl",
            "quantity": 250,
            "weight": null
        }))
        .unwrap();

        assert_eq!(order.action, Some(OrderAction::Buy));
        assert_eq!(order.ticker.as_deref(), Some("aapl"));
        assert_eq!(order.quantity, Some(250));
        assert_eq!(order.weight, None);
        assert_eq!(order.accounts, None);
        assert!(order.applies_to_all_accounts());
    }

    #[test]
    fn test_unknown_action_keeps_the_order() {
        let order: Order = serde_json::from_value(json!({
            "action": "purchase",
            "ticker": "msft",
            "quantity": 10
        }))
        .unwrap();

        assert_eq!(order.action, None);
        assert_eq!(order.ticker.as_deref(), Some("msft"));
        assert_eq!(order.quantity, Some(10));
        assert!(!order.is_actionable());
    }

    #[test]
    fn test_whole_float_quantity_is_accepted() {
        let order: Order = serde_json::from_value(json!({ "action": "buy", "quantity": 250.0 })).unwrap();
        assert_eq!(order.quantity, Some(250));

        let order: Order = serde_json::from_value(json!({ "quantity": null })).unwrap();
        assert_eq!(order.quantity, None);
    }

    #[test]
    fn test_bad_quantity_is_rejected() {
        for quantity in [json!(-5), json!(2.5), json!(-1.0), json!("lots")] {
            let result: Result<Order, _> = serde_json::from_value(json!({ "quantity": quantity }));
            assert!(result.is_err(), "{}", quantity);
        }
    }

    #[test]
    fn test_serialization_keeps_every_field() {
        let value = serde_json::to_value(Order::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ["action", "ticker", "quantity", "weight", "accounts"] {
            assert!(object.contains_key(key), "missing {}", key);
            assert!(object[key].is_null());
        }
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let orders = Orders {
            orders: vec![Order {
                action: Some(OrderAction::Sell),
                ticker: Some("rivn".to_string()),
                quantity: None,
                weight: Some(0.3),
                accounts: Some(vec!["ushy".to_string(), "melagg".to_string()]),
            }],
        };

        let text = serde_json::to_string(&orders).unwrap();
        let back: Orders = serde_json::from_str(&text).unwrap();
        assert_eq!(orders, back);
    }
}
