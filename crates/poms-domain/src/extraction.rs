//! Extraction module - the typed result of one model call

use crate::dates::NormalizeDates;
use crate::holding::Holdings;
use crate::order::Orders;
use crate::performance::Performances;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three collection schemas a model call can be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionSchema {
    /// `Orders { orders: [Order] }`
    Orders,
    /// `Holdings { holdings: [PortfolioHolding] }`
    Holdings,
    /// `Performances { performances: [PortfolioPerformance] }`
    Performances,
}

impl ExtractionSchema {
    /// All schemas, in routing priority order
    pub const ALL: [ExtractionSchema; 3] = [
        ExtractionSchema::Orders,
        ExtractionSchema::Holdings,
        ExtractionSchema::Performances,
    ];

    /// Name of the tool the model is asked to call
    pub fn tool_name(&self) -> &'static str {
        match self {
            ExtractionSchema::Orders => "Orders",
            ExtractionSchema::Holdings => "Holdings",
            ExtractionSchema::Performances => "Performances",
        }
    }

    /// Key of the list inside the collection object
    pub fn list_key(&self) -> &'static str {
        match self {
            ExtractionSchema::Orders => "orders",
            ExtractionSchema::Holdings => "holdings",
            ExtractionSchema::Performances => "performances",
        }
    }
}

impl fmt::Display for ExtractionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// A structured result from one of the three pipelines
///
/// Serializes as the bare collection (`{"orders": [...]}` and so on) so the
/// JSON a caller sees matches the schema the model was constrained to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extraction {
    /// Trading orders
    Orders(Orders),
    /// Holdings requests
    Holdings(Holdings),
    /// Performance requests
    Performances(Performances),
}

impl Extraction {
    /// The schema this result conforms to
    pub fn schema(&self) -> ExtractionSchema {
        match self {
            Extraction::Orders(_) => ExtractionSchema::Orders,
            Extraction::Holdings(_) => ExtractionSchema::Holdings,
            Extraction::Performances(_) => ExtractionSchema::Performances,
        }
    }

    /// Number of records in the collection
    pub fn len(&self) -> usize {
        match self {
            Extraction::Orders(c) => c.orders.len(),
            Extraction::Holdings(c) => c.holdings.len(),
            Extraction::Performances(c) => c.performances.len(),
        }
    }

    /// Whether the model extracted nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NormalizeDates for Extraction {
    fn normalize_dates(&mut self, today: NaiveDate) {
        match self {
            Extraction::Orders(c) => c.normalize_dates(today),
            Extraction::Holdings(c) => c.normalize_dates(today),
            Extraction::Performances(c) => c.normalize_dates(today),
        }
    }
}

impl From<Orders> for Extraction {
    fn from(c: Orders) -> Self {
        Extraction::Orders(c)
    }
}

impl From<Holdings> for Extraction {
    fn from(c: Holdings) -> Self {
        Extraction::Holdings(c)
    }
}

impl From<Performances> for Extraction {
    fn from(c: Performances) -> Self {
        Extraction::Performances(c)
    }
}
