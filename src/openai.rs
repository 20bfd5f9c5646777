//! OpenAI-compatible client configuration.

use crate::config::LlmSettings;
use crate::error::{PlotRagError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Read the API credential from the environment variable named in the settings.
///
/// A missing or empty variable is a configuration error, so the query
/// pipeline halts before anything is sent.
pub fn api_key(settings: &LlmSettings) -> Result<String> {
    match std::env::var(&settings.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        Ok(_) => Err(PlotRagError::Config(format!(
            "{} is empty. Set it in your environment or in a .env file",
            settings.api_key_env
        ))),
        Err(_) => Err(PlotRagError::Config(format!(
            "{} not set. Set it in your environment or in a .env file",
            settings.api_key_env
        ))),
    }
}

/// Create a client for the configured endpoint and credential.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new().with_api_key(api_key(settings)?);
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    Ok(Client::with_config(config).with_http_client(http_client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_config_error() {
        let settings = LlmSettings {
            api_key_env: "PLOTRAG_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmSettings::default()
        };

        let err = api_key(&settings).unwrap_err();
        assert!(matches!(err, PlotRagError::Config(_)));
        assert!(err.to_string().contains("PLOTRAG_TEST_KEY_THAT_IS_NEVER_SET"));
    }
}
