use serde::Deserialize;

use crate::domain::{DomainError, SemanticCacheConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub cache: CacheOptions,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which embedding collaborator to construct
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Remote embedding API
    Remote,
    /// In-process feature-hashing embedder
    #[default]
    Local,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default, rename = "type")]
    pub provider: EmbeddingProviderKind,
    /// Embedding model name (remote only; provider default when unset)
    pub model_name: Option<String>,
    /// API key (remote only)
    pub api_key: Option<String>,
    /// Override for the provider base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionSettings {
    /// API key for the completion provider
    #[serde(default)]
    pub api_key: String,
    /// Completion model
    #[serde(default)]
    pub model: String,
    /// Optional system instruction prepended to every completion call
    pub prompt_prefix: Option<String>,
    /// Override for the provider base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheOptions {
    /// Backend URL for entry storage: `memory://` or `redis://host:port`
    #[serde(default = "default_store_url")]
    pub store_url: String,
    /// Similarity threshold for cache hits (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Entry time-to-live in seconds; 0 disables storage
    #[serde(default = "default_ttl_secs")]
    pub cache_ttl: u64,
    /// Embedding vector length for this cache instance
    #[serde(default = "default_embedding_size")]
    pub embedding_size: usize,
    /// Optional capacity bound
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_store_url() -> String {
    "memory://".to_string()
}

fn default_similarity_threshold() -> f32 {
    0.95
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_embedding_size() -> usize {
    1536
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            similarity_threshold: default_similarity_threshold(),
            cache_ttl: default_ttl_secs(),
            embedding_size: default_embedding_size(),
            max_entries: None,
        }
    }
}

impl CacheOptions {
    /// Convert to the validated engine configuration
    pub fn to_cache_config(&self) -> Result<SemanticCacheConfig, DomainError> {
        let mut config = SemanticCacheConfig::new()
            .with_similarity_threshold(self.similarity_threshold)
            .with_ttl(std::time::Duration::from_secs(self.cache_ttl))
            .with_embedding_size(self.embedding_size);

        if let Some(max) = self.max_entries {
            config = config.with_max_entries(max);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from config files and `SEMCACHE__`-prefixed environment
    /// variables, then validate them
    pub fn load() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();

        let settings: AppSettings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SEMCACHE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the loaded settings
    pub fn validate(&self) -> Result<(), DomainError> {
        self.cache.to_cache_config()?;

        if !self.cache.store_url.starts_with("memory://")
            && !self.cache.store_url.starts_with("redis://")
            && !self.cache.store_url.starts_with("rediss://")
        {
            return Err(DomainError::configuration(format!(
                "Unsupported store URL scheme: {}",
                self.cache.store_url
            )));
        }

        if self.embedding.provider == EmbeddingProviderKind::Remote
            && self.embedding.api_key.as_deref().unwrap_or("").is_empty()
        {
            return Err(DomainError::configuration(
                "embedding.api_key is required for the remote embedding provider",
            ));
        }

        if self.completion.api_key.is_empty() {
            return Err(DomainError::configuration(
                "completion.api_key is required",
            ));
        }

        if self.completion.model.is_empty() {
            return Err(DomainError::configuration("completion.model is required"));
        }

        Ok(())
    }
}
