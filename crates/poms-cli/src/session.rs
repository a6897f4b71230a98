//! Model session setup from the active profile.

use crate::config::{Config, Profile};
use crate::error::Result;
use poms_extractor::{Extractor, ExtractorConfig, QueryRouter};
use poms_llm::OpenAiProvider;
use std::time::Duration;
use tracing::info;

/// Router backed by an OpenAI-compatible model service.
pub type Router = QueryRouter<OpenAiProvider>;

/// Build the model client for a profile.
///
/// Fails with `LlmError::MissingCredential` when the profile's API key
/// variable is unset.
pub fn build_provider(profile: &Profile) -> Result<OpenAiProvider> {
    let provider = OpenAiProvider::from_env(&profile.endpoint, &profile.model, &profile.api_key_env)?
        .with_timeout(Duration::from_secs(profile.timeout_secs))?;
    Ok(provider)
}

/// Build a router for the active profile.
pub fn build_router(config: &Config) -> Result<Router> {
    let profile = config.get_active_profile()?;
    info!(
        "Using profile '{}' ({} at {})",
        config.active_profile, profile.model, profile.endpoint
    );

    router_with(build_provider(profile)?, &profile.model, config.extractor.clone())
}

fn router_with(
    provider: OpenAiProvider,
    model: &str,
    extractor_config: ExtractorConfig,
) -> Result<Router> {
    let extractor = Extractor::new(provider, extractor_config)?.with_model_name(model);
    Ok(QueryRouter::new(extractor))
}
