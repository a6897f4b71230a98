//! Query command implementation.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use poms_domain::traits::LlmProvider;
use poms_domain::Extraction;
use poms_extractor::QueryRouter;
use tracing::error;

/// Shown when nothing could be extracted from the text.
pub const NOT_UNDERSTOOD: &str = "I couldn't understand your query. Please try rephrasing \
or use one of the example queries (`poms examples`).";

/// Shown for blank input.
pub const EMPTY_QUERY: &str = "Please enter a query to process.";

/// What happened to one query.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Input was blank; nothing was routed
    Empty,
    /// No pipeline matched, or the model declined to call the tool
    NotUnderstood,
    /// The pipeline produced a collection
    Extracted(Extraction),
    /// The model service or parser failed
    Failed(String),
}

/// Route `text` and fold every result into an outcome.
///
/// Errors never escape: a failed model call becomes [`QueryOutcome::Failed`].
pub async fn process_query<L>(router: &QueryRouter<L>, text: &str) -> QueryOutcome
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    if text.trim().is_empty() {
        return QueryOutcome::Empty;
    }

    match router.route(text).await {
        Ok(Some(extraction)) => QueryOutcome::Extracted(extraction),
        Ok(None) => QueryOutcome::NotUnderstood,
        Err(e) => {
            error!("Query failed: {}", e);
            QueryOutcome::Failed(e.to_string())
        }
    }
}

impl QueryOutcome {
    /// Whether the outcome should go to stderr.
    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    /// Text to show for this outcome.
    pub fn render(&self, formatter: &Formatter) -> Result<String> {
        Ok(match self {
            QueryOutcome::Empty => formatter.warning(EMPTY_QUERY),
            QueryOutcome::NotUnderstood => formatter.warning(NOT_UNDERSTOOD),
            QueryOutcome::Failed(message) => formatter.error(&format!(
                "An error occurred while processing your query: {}",
                message
            )),
            QueryOutcome::Extracted(extraction) => match formatter.format() {
                OutputFormat::Json => formatter.format_extraction(extraction)?,
                OutputFormat::Table => format!(
                    "{}\n{}",
                    formatter.success("Query processed successfully!"),
                    formatter.format_extraction(extraction)?
                ),
            },
        })
    }
}

/// Execute the query command.
///
/// A failed query is reported, not returned: the command still succeeds.
pub async fn execute_query<L>(text: &str, router: &QueryRouter<L>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let outcome = process_query(router, text).await;
    let rendered = outcome.render(formatter)?;

    if outcome.is_failure() {
        eprintln!("{}", rendered);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
