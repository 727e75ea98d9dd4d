//! Completion provider factory

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::CompletionSettings;
use crate::domain::completion::CompletionProvider;
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClient;

use super::openai::OpenAiCompletionProvider;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Factory for constructing the configured completion provider
#[derive(Debug, Default)]
pub struct CompletionProviderFactory;

impl CompletionProviderFactory {
    /// Build the provider from settings
    pub fn create(
        settings: &CompletionSettings,
    ) -> Result<Arc<dyn CompletionProvider>, DomainError> {
        if settings.api_key.is_empty() {
            return Err(DomainError::configuration("completion.api_key is required"));
        }

        let client = HttpClient::with_timeout(DEFAULT_HTTP_TIMEOUT)?;

        let provider = match &settings.base_url {
            Some(url) => {
                info!("Using completion provider with base URL: {}", url);
                OpenAiCompletionProvider::with_base_url(client, settings.api_key.clone(), url)
            }
            None => {
                info!("Using completion provider with default base URL");
                OpenAiCompletionProvider::new(client, settings.api_key.clone())
            }
        };

        Ok(Arc::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let settings = CompletionSettings {
            api_key: "sk-test".to_string(),
            model: "gpt-4".to_string(),
            prompt_prefix: None,
            base_url: None,
        };

        let provider = CompletionProviderFactory::create(&settings).unwrap();

        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_without_key_fails() {
        let settings = CompletionSettings::default();

        let result = CompletionProviderFactory::create(&settings);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
