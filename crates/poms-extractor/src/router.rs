//! Query routing - pick a pipeline, then extract

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use poms_domain::traits::{IntentClassifier, LlmProvider};
use poms_domain::{Extraction, Intent, KeywordClassifier};
use tracing::{debug, info};

/// Routes raw query text to the order, holding or performance pipeline
///
/// Unrecognized text is a normal outcome: [`QueryRouter::route`] returns
/// `Ok(None)` without calling the model.
pub struct QueryRouter<L>
where
    L: LlmProvider,
{
    classifier: Box<dyn IntentClassifier + Send + Sync>,
    extractor: Extractor<L>,
}

impl<L> QueryRouter<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a router using the default keyword classifier
    pub fn new(extractor: Extractor<L>) -> Self {
        Self {
            classifier: Box::new(KeywordClassifier::default()),
            extractor,
        }
    }

    /// Replace the intent classifier
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: IntentClassifier + Send + Sync + 'static,
    {
        self.classifier = Box::new(classifier);
        self
    }

    /// The extractor behind every pipeline
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// Classify without extracting
    pub fn classify(&self, text: &str) -> Intent {
        self.classifier.classify(text)
    }

    /// Classify `text` and run the matching pipeline
    ///
    /// # Errors
    ///
    /// Model-service and parse failures from the extractor propagate; the
    /// caller decides how to report them.
    pub async fn route(&self, text: &str) -> Result<Option<Extraction>, ExtractorError> {
        let intent = self.classify(text);
        debug!("Classified query as {}", intent);

        match intent.schema() {
            Some(schema) => self.extractor.extract(schema, text).await,
            None => {
                info!("Query not recognized, skipping extraction");
                Ok(None)
            }
        }
    }
}
