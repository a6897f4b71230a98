//! Classify command implementation.

use crate::error::Result;
use crate::output::Formatter;
use poms_domain::traits::IntentClassifier;

/// Execute the classify command.
///
/// Uses the keyword rules only; the model is never contacted.
pub fn execute_classify<C>(text: &str, classifier: &C, formatter: &Formatter) -> Result<()>
where
    C: IntentClassifier + ?Sized,
{
    let intent = classifier.classify(text);
    println!("{}", formatter.format_intent(text, intent)?);
    Ok(())
}
