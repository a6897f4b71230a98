//! Performance module - requests for account returns

use crate::dates::{normalize_window, NormalizeDates};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A request for portfolio performance over a date window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    /// Start of the evaluation window (ISO-8601 once normalized)
    #[serde(default)]
    pub start_date: Option<String>,

    /// End of the evaluation window
    #[serde(default)]
    pub end_date: Option<String>,

    /// A single account or a delimited list of accounts
    #[serde(default)]
    pub accounts: Option<String>,
}

impl PortfolioPerformance {
    /// Split `accounts` on commas into trimmed, non-empty names
    pub fn account_list(&self) -> Vec<String> {
        self.accounts
            .as_deref()
            .map(|accounts| {
                accounts
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl NormalizeDates for PortfolioPerformance {
    fn normalize_dates(&mut self, today: NaiveDate) {
        let (start, end) = normalize_window(self.start_date.take(), self.end_date.take(), today);
        self.start_date = start;
        self.end_date = end;
    }
}

/// Extracted data about performance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performances {
    /// Performance requests in the order they were mentioned
    pub performances: Vec<PortfolioPerformance>,
}

impl NormalizeDates for Performances {
    fn normalize_dates(&mut self, today: NaiveDate) {
        self.performances.normalize_dates(today);
    }
}
