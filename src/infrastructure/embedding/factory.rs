//! Embedding provider factory

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{EmbeddingProviderKind, EmbeddingSettings};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClient;

use super::local::LocalEmbeddingProvider;
use super::openai::OpenAiEmbeddingProvider;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Factory for constructing the configured embedding provider
#[derive(Debug, Default)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Build the provider selected by the settings
    pub fn create(
        settings: &EmbeddingSettings,
        embedding_size: usize,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match settings.provider {
            EmbeddingProviderKind::Local => {
                info!("Using local feature-hash embedding provider");
                Ok(Arc::new(LocalEmbeddingProvider::new(embedding_size)))
            }
            EmbeddingProviderKind::Remote => {
                let api_key = settings.api_key.clone().ok_or_else(|| {
                    DomainError::configuration(
                        "embedding.api_key is required for the remote embedding provider",
                    )
                })?;

                let client = HttpClient::with_timeout(DEFAULT_HTTP_TIMEOUT)?;

                let provider = match &settings.base_url {
                    Some(url) => {
                        info!("Using remote embedding provider with base URL: {}", url);
                        OpenAiEmbeddingProvider::with_base_url(client, api_key, url)
                    }
                    None => {
                        info!("Using remote embedding provider with default base URL");
                        OpenAiEmbeddingProvider::new(client, api_key)
                    }
                };

                Ok(Arc::new(provider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_local() {
        let settings = EmbeddingSettings::default();

        let provider = EmbeddingProviderFactory::create(&settings, 256).unwrap();

        assert_eq!(provider.provider_name(), "local");
        assert_eq!(provider.dimensions("feature-hash"), Some(256));
    }

    #[test]
    fn test_create_remote() {
        let settings = EmbeddingSettings {
            provider: EmbeddingProviderKind::Remote,
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };

        let provider = EmbeddingProviderFactory::create(&settings, 1536).unwrap();

        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_remote_without_key_fails() {
        let settings = EmbeddingSettings {
            provider: EmbeddingProviderKind::Remote,
            ..Default::default()
        };

        let result = EmbeddingProviderFactory::create(&settings, 1536);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
