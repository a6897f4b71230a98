//! Holding module - requests for position and exposure data

use crate::dates::{normalize_window, NormalizeDates};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account value meaning "every account"
pub const ALL_ACCOUNTS: &str = "ALL";

/// A request for holdings data
///
/// `start_date` is always concrete once the record has been normalized; a
/// request that names no date is a request for today's holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    /// Ticker to fetch holdings for, or none for all holdings
    #[serde(default)]
    pub ticker: Option<String>,

    /// Accounts to view holdings for; `["ALL"]` means every account
    #[serde(default)]
    pub accounts: Option<Vec<String>>,

    /// Start of the window (ISO-8601 once normalized)
    #[serde(default)]
    pub start_date: Option<String>,

    /// End of the window
    #[serde(default)]
    pub end_date: Option<String>,

    /// Metrics to fetch: exposure, yield, duration, market value, price, weight
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

impl PortfolioHolding {
    /// Whether the request covers every account
    pub fn applies_to_all_accounts(&self) -> bool {
        match &self.accounts {
            None => true,
            Some(accounts) => {
                accounts.is_empty() || accounts.iter().any(|a| a == ALL_ACCOUNTS)
            }
        }
    }
}

impl NormalizeDates for PortfolioHolding {
    fn normalize_dates(&mut self, today: NaiveDate) {
        let (start, end) = normalize_window(self.start_date.take(), self.end_date.take(), today);
        self.start_date = start;
        self.end_date = end;
    }
}

/// Extracted data about holdings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Holdings {
    /// Holding requests in the order they were mentioned
    pub holdings: Vec<PortfolioHolding>,
}

impl NormalizeDates for Holdings {
    fn normalize_dates(&mut self, today: NaiveDate) {
        self.holdings.normalize_dates(today);
    }
}
