//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use poms_domain::{
    Extraction, Holdings, Intent, Order, Orders, Performances, PortfolioHolding,
    PortfolioPerformance,
};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const NOT_AVAILABLE: &str = "N/A";
const ALL_ACCOUNTS: &str = "All Accounts";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction result.
    ///
    /// JSON mode prints the bare collection with every field present, nulls
    /// included.
    pub fn format_extraction(&self, extraction: &Extraction) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
            OutputFormat::Table => Ok(match extraction {
                Extraction::Orders(orders) => self.format_orders_table(orders),
                Extraction::Holdings(holdings) => self.format_holdings_table(holdings),
                Extraction::Performances(performances) => {
                    self.format_performances_table(performances)
                }
            }),
        }
    }

    fn format_orders_table(&self, orders: &Orders) -> String {
        if orders.orders.is_empty() {
            return self.warning("No orders found");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Action", "Ticker", "Quantity", "Weight", "Accounts"]);

        for (idx, order) in orders.orders.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                order
                    .action
                    .map(|a| a.as_str().to_uppercase())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                or_placeholder(order.ticker.as_deref(), NOT_AVAILABLE),
                order
                    .quantity
                    .map(group_thousands)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                order
                    .weight
                    .map(|w| format!("{:.2}%", w))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                order_accounts(order),
            ]);
        }

        self.titled("Trading Orders", builder)
    }

    fn format_holdings_table(&self, holdings: &Holdings) -> String {
        if holdings.holdings.is_empty() {
            return self.warning("No holdings found");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Ticker", "Accounts", "Start Date", "End Date", "Fields"]);

        for (idx, holding) in holdings.holdings.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                or_placeholder(holding.ticker.as_deref(), "All"),
                holding_accounts(holding),
                or_placeholder(holding.start_date.as_deref(), NOT_AVAILABLE),
                or_placeholder(holding.end_date.as_deref(), NOT_AVAILABLE),
                match &holding.fields {
                    Some(fields) if !fields.is_empty() => fields.join(", "),
                    _ => "All available".to_string(),
                },
            ]);
        }

        self.titled("Portfolio Holdings", builder)
    }

    fn format_performances_table(&self, performances: &Performances) -> String {
        if performances.performances.is_empty() {
            return self.warning("No performance data found");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Accounts", "Start Date", "End Date"]);

        for (idx, performance) in performances.performances.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                performance_accounts(performance),
                or_placeholder(performance.start_date.as_deref(), NOT_AVAILABLE),
                or_placeholder(performance.end_date.as_deref(), NOT_AVAILABLE),
            ]);
        }

        self.titled("Portfolio Performance", builder)
    }

    fn titled(&self, title: &str, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", self.colorize(title, "cyan"), table)
    }

    /// Format the pipeline a query was routed to.
    pub fn format_intent(&self, query: &str, intent: Intent) -> Result<String> {
        let pipeline = intent.schema().map(|s| s.tool_name());
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "query": query,
                "intent": intent.as_str(),
                "pipeline": pipeline,
            }))?),
            OutputFormat::Table => Ok(match pipeline {
                Some(pipeline) => self.info(&format!("{} query ({} pipeline)", intent, pipeline)),
                None => self.warning("Query not recognized; no pipeline would run"),
            }),
        }
    }

    /// Format the example queries, grouped by category.
    pub fn format_examples(&self, examples: &[(&str, &[&str])]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let categories: Vec<serde_json::Value> = examples
                    .iter()
                    .map(|(category, queries)| {
                        serde_json::json!({ "category": category, "queries": queries })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&categories)?)
            }
            OutputFormat::Table => {
                let mut lines = Vec::new();
                for (category, queries) in examples {
                    lines.push(self.colorize(category, "cyan"));
                    lines.extend(queries.iter().map(|q| format!("  • {}", q)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value.unwrap_or(placeholder).to_string()
}

fn order_accounts(order: &Order) -> String {
    match &order.accounts {
        Some(accounts) if !order.applies_to_all_accounts() => accounts.join(", "),
        _ => ALL_ACCOUNTS.to_string(),
    }
}

fn holding_accounts(holding: &PortfolioHolding) -> String {
    match &holding.accounts {
        Some(accounts) if !holding.applies_to_all_accounts() => accounts.join(", "),
        _ => ALL_ACCOUNTS.to_string(),
    }
}

fn performance_accounts(performance: &PortfolioPerformance) -> String {
    let accounts = performance.account_list();
    if accounts.is_empty() {
        ALL_ACCOUNTS.to_string()
    } else {
        accounts.join(", ")
    }
}

/// 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
