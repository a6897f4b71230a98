//! Intent classification - which pipeline a query belongs to

use crate::extraction::ExtractionSchema;
use crate::traits::IntentClassifier;
use std::fmt;

/// The classified purpose of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Place, resize or roll a trade
    Order,
    /// Look up positions or exposure
    Holding,
    /// Look up returns
    Performance,
    /// Nothing we know how to extract
    Unrecognized,
}

impl Intent {
    /// Get the intent name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Order => "order",
            Intent::Holding => "holding",
            Intent::Performance => "performance",
            Intent::Unrecognized => "unrecognized",
        }
    }

    /// The schema the extraction pipeline for this intent produces
    pub fn schema(&self) -> Option<ExtractionSchema> {
        match self {
            Intent::Order => Some(ExtractionSchema::Orders),
            Intent::Holding => Some(ExtractionSchema::Holdings),
            Intent::Performance => Some(ExtractionSchema::Performances),
            Intent::Unrecognized => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals for trading orders
pub const ORDER_KEYWORDS: &[&str] = &["buy", "sell", "increase", "decrease"];

/// Signals for holdings requests
pub const HOLDING_KEYWORDS: &[&str] = &["hold", "position", "exposure", "yield", "duration"];

/// Signals for performance requests
pub const PERFORMANCE_KEYWORDS: &[&str] = &["performance", "return"];

/// One row of the keyword table
#[derive(Debug, Clone)]
pub struct KeywordRule {
    /// Intent selected when the rule matches
    pub intent: Intent,
    /// Lowercase substrings, any of which triggers the rule
    pub keywords: Vec<String>,
}

impl KeywordRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Case-insensitive substring classifier
///
/// Rules are tried in order and the first match wins, so a query that
/// mentions both "sell" and "position" is an order. Anything that matches no
/// rule is [`Intent::Unrecognized`].
///
/// # Examples
///
/// ```
/// use poms_domain::{Intent, KeywordClassifier};
/// use poms_domain::traits::IntentClassifier;
///
/// let classifier = KeywordClassifier::default();
/// assert_eq!(classifier.classify("Sell my TSLA position"), Intent::Order);
/// assert_eq!(classifier.classify("purple elephant"), Intent::Unrecognized);
/// ```
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    /// A classifier with no rules; every query is unrecognized
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule below every existing one
    pub fn with_rule<I, S>(mut self, intent: Intent, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules.push(KeywordRule {
            intent,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        });
        self
    }

    /// The rules in priority order
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::empty()
            .with_rule(Intent::Order, ORDER_KEYWORDS)
            .with_rule(Intent::Holding, HOLDING_KEYWORDS)
            .with_rule(Intent::Performance, PERFORMANCE_KEYWORDS)
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unrecognized)
    }
}
