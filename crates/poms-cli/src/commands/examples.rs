//! Examples command implementation.

use crate::error::Result;
use crate::output::Formatter;
use poms_extractor::EXAMPLE_QUERIES;

/// Execute the examples command.
pub fn execute_examples(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_examples(EXAMPLE_QUERIES)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use poms_domain::{Intent, KeywordClassifier};
    use poms_domain::traits::IntentClassifier;

    #[test]
    fn test_every_example_is_routed() {
        let classifier = KeywordClassifier::default();
        for (category, queries) in EXAMPLE_QUERIES {
            for query in *queries {
                assert_ne!(
                    classifier.classify(query),
                    Intent::Unrecognized,
                    "{}: {}",
                    category,
                    query
                );
            }
        }
    }

    #[test]
    fn test_execute_examples() {
        assert!(execute_examples(&Formatter::new(OutputFormat::Table, false)).is_ok());
    }
}
