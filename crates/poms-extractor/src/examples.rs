//! Few-shot examples that steer extraction
//!
//! Each example pairs a query with the tool call a correct model would make.
//! Dates are written the way a user would say them ("today"); the prompt
//! builder resolves them before rendering, so the model sees the same
//! concrete dates it is expected to produce.

use crate::error::ExtractorError;
use poms_domain::{
    Extraction, ExtractionSchema, Holdings, Order, OrderAction, Orders, Performances,
    PortfolioHolding, PortfolioPerformance,
};

/// A demonstration pair used to bias the model
#[derive(Debug, Clone, PartialEq)]
pub struct FewShotExample {
    /// Query text
    pub input: &'static str,
    /// Expected collection for that query
    pub output: Extraction,
}

/// Example queries grouped by category, for help and discovery output
pub const EXAMPLE_QUERIES: &[(&str, &[&str])] = &[
    (
        "Trading Orders",
        &[
            "Buy 250 AAPL in account capers",
            "Sell 500 TSLA in accounts capers, ushy and halifax",
            "Increase exposure to AAPL by 0.5%",
            "Decrease exposure to RIVN by 0.3% in accounts ushy, melagg",
        ],
    ),
    (
        "Portfolio Holdings",
        &[
            "What are my holdings in account ABC as of today",
            "Show me positions of TSLA in my account CAPERS",
            "What's my exposure to MSFT in accounts HALIFAX, MANIFAX",
            "Show change of my positions between 01-Jan-2024 to 31-Mar-2024",
        ],
    ),
    (
        "Performance Analysis",
        &[
            "What are my returns in account capers, ushy",
            "Show performance of all accounts YTD",
            "Compare returns between accounts A and B",
        ],
    ),
];

/// Immutable store of few-shot examples per schema
#[derive(Debug, Clone, Default)]
pub struct ExampleStore {
    orders: Vec<FewShotExample>,
    holdings: Vec<FewShotExample>,
    performances: Vec<FewShotExample>,
}

impl ExampleStore {
    /// A store with no examples
    pub fn empty() -> Self {
        Self::default()
    }

    /// The examples shipped with the extractor
    pub fn builtin() -> Self {
        Self {
            orders: order_examples(),
            holdings: holding_examples(),
            performances: performance_examples(),
        }
    }

    /// Add an example to the list for its schema
    pub fn with_example(mut self, example: FewShotExample) -> Self {
        match example.output.schema() {
            ExtractionSchema::Orders => self.orders.push(example),
            ExtractionSchema::Holdings => self.holdings.push(example),
            ExtractionSchema::Performances => self.performances.push(example),
        }
        self
    }

    /// Examples for one schema, in definition order
    pub fn for_schema(&self, schema: ExtractionSchema) -> &[FewShotExample] {
        match schema {
            ExtractionSchema::Orders => &self.orders,
            ExtractionSchema::Holdings => &self.holdings,
            ExtractionSchema::Performances => &self.performances,
        }
    }

    /// Check every example has input text and a non-empty output
    pub fn validate(&self) -> Result<(), ExtractorError> {
        for schema in ExtractionSchema::ALL {
            for (idx, example) in self.for_schema(schema).iter().enumerate() {
                if example.input.trim().is_empty() {
                    return Err(ExtractorError::InvalidExample(format!(
                        "{} example {} has no input text",
                        schema, idx
                    )));
                }
                if example.output.is_empty() {
                    return Err(ExtractorError::InvalidExample(format!(
                        "{} example {} ('{}') has no expected records",
                        schema, idx, example.input
                    )));
                }
            }
        }
        Ok(())
    }
}

fn accounts(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|n| n.to_string()).collect())
}

fn order(input: &'static str, order: Order) -> FewShotExample {
    FewShotExample {
        input,
        output: Orders { orders: vec![order] }.into(),
    }
}

fn holding(input: &'static str, holding: PortfolioHolding) -> FewShotExample {
    FewShotExample {
        input,
        output: Holdings { holdings: vec![holding] }.into(),
    }
}

fn performance(input: &'static str, performance: PortfolioPerformance) -> FewShotExample {
    FewShotExample {
        input,
        output: Performances { performances: vec![performance] }.into(),
    }
}

fn default_fields() -> Option<Vec<String>> {
    Some(["weight", "price", "mv", "yield"].iter().map(|f| f.to_string()).collect())
}

fn order_examples() -> Vec<FewShotExample> {
    vec![
        order(
            "Buy 250 AAPL in account capers",
            Order {
                action: Some(OrderAction::Buy),
                ticker: Some("aapl".into()),
                quantity: Some(250),
                weight: None,
                accounts: accounts(&["capers"]),
            },
        ),
        order(
            "Sell 500 TSLA in accounts capers, ushy and halifax",
            Order {
                action: Some(OrderAction::Sell),
                ticker: Some("tsla".into()),
                quantity: Some(500),
                weight: None,
                accounts: accounts(&["capers", "ushy", "halifax"]),
            },
        ),
        order(
            "Roll 500 MSFT",
            Order {
                action: Some(OrderAction::Roll),
                ticker: Some("msft".into()),
                quantity: Some(500),
                weight: None,
                accounts: None,
            },
        ),
        order(
            "Increase exposure to aapl by 0.5%",
            Order {
                action: Some(OrderAction::Buy),
                ticker: Some("aapl".into()),
                quantity: None,
                weight: Some(0.5),
                accounts: None,
            },
        ),
        order(
            "Decrease exposure to aapl by 0.5%",
            Order {
                action: Some(OrderAction::Sell),
                ticker: Some("aapl".into()),
                quantity: None,
                weight: Some(0.5),
                accounts: None,
            },
        ),
    ]
}

fn holding_examples() -> Vec<FewShotExample> {
    vec![
        holding(
            "what are my holdings in account ABC as of today",
            PortfolioHolding {
                ticker: None,
                accounts: accounts(&["ABC"]),
                start_date: Some("today".into()),
                end_date: None,
                fields: default_fields(),
            },
        ),
        holding(
            "show me positions of TSLA in my account CAPERS",
            PortfolioHolding {
                ticker: Some("TSLA".into()),
                accounts: accounts(&["CAPERS"]),
                start_date: Some("today".into()),
                end_date: None,
                fields: default_fields(),
            },
        ),
        holding(
            "what's my exposure to MSFT in my accounts HALIFAX, MANIFAX and SIMFAX as of 31-Dec-2023",
            PortfolioHolding {
                ticker: Some("MSFT".into()),
                accounts: accounts(&["HALIFAX", "MANIFAX", "SIMFAX"]),
                start_date: Some("31-Dec-2023".into()),
                end_date: None,
                fields: default_fields(),
            },
        ),
        holding(
            "Show change of my positions in all of my accounts between 01-Jan-2024 to 31-Mar-2024",
            PortfolioHolding {
                ticker: None,
                accounts: accounts(&["ALL"]),
                start_date: Some("01-Jan-2024".into()),
                end_date: Some("31-Mar-2024".into()),
                fields: default_fields(),
            },
        ),
    ]
}

fn performance_examples() -> Vec<FewShotExample> {
    vec![performance(
        "what are my returns in account capers, ushy",
        PortfolioPerformance {
            accounts: Some("capers,ushy".into()),
            start_date: Some("05-May-2024".into()),
            end_date: Some("02-May-2024".into()),
        },
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_examples_are_valid() {
        let store = ExampleStore::builtin();
        assert!(store.validate().is_ok());
        assert_eq!(store.for_schema(ExtractionSchema::Orders).len(), 5);
        assert_eq!(store.for_schema(ExtractionSchema::Holdings).len(), 4);
        assert_eq!(store.for_schema(ExtractionSchema::Performances).len(), 1);
    }

    #[test]
    fn test_outputs_match_their_list() {
        let store = ExampleStore::builtin();
        for schema in ExtractionSchema::ALL {
            for example in store.for_schema(schema) {
                assert_eq!(example.output.schema(), schema, "{}", example.input);
            }
        }
    }

    #[test]
    fn test_empty_output_is_rejected() {
        let store = ExampleStore::empty().with_example(FewShotExample {
            input: "Buy something",
            output: Orders::default().into(),
        });
        assert!(matches!(store.validate(), Err(ExtractorError::InvalidExample(_))));
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let store = ExampleStore::empty().with_example(order("  ", Order::default()));
        assert!(matches!(store.validate(), Err(ExtractorError::InvalidExample(_))));
    }

    #[test]
    fn test_example_queries_cover_every_category() {
        let categories: Vec<_> = EXAMPLE_QUERIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            categories,
            vec!["Trading Orders", "Portfolio Holdings", "Performance Analysis"]
        );
        assert!(EXAMPLE_QUERIES.iter().all(|(_, queries)| !queries.is_empty()));
    }
}
