//! Semantic response cache for LLM APIs
//!
//! Reduces redundant calls to an expensive completion service by caching
//! responses keyed on *semantic* similarity between queries rather than
//! exact text matches:
//! - queries are embedded by a pluggable embedding provider (remote API or
//!   local feature hashing)
//! - a similarity index answers "best match above threshold" over the
//!   stored entries using cosine similarity, with TTL-based expiry
//! - misses fall through to a pluggable completion provider and the fresh
//!   response is cached
//! - entries live in memory or in Redis, selected by a store URL

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppSettings;
pub use domain::{
    CacheEntry, CacheStats, DomainError, EntryStore, SemanticCacheConfig, SimilarityIndex,
    StatsSnapshot,
};
pub use infrastructure::services::{
    QueryResult, ResponseSource, SemanticCacheService, SemanticCacheServiceTrait,
};

use infrastructure::completion::CompletionProviderFactory;
use infrastructure::embedding::EmbeddingProviderFactory;
use infrastructure::store::StoreFactory;

/// Create a semantic cache service from loaded settings and verify its
/// collaborators are reachable.
pub async fn create_cache_service(
    settings: &AppSettings,
) -> Result<SemanticCacheService, DomainError> {
    settings.validate()?;

    let cache_config = settings.cache.to_cache_config()?;

    let store = StoreFactory::create(&settings.cache).await?;
    let embedding_provider =
        EmbeddingProviderFactory::create(&settings.embedding, cache_config.embedding_size)?;
    let completion_provider = CompletionProviderFactory::create(&settings.completion)?;

    let mut service = SemanticCacheService::new(
        store,
        embedding_provider,
        completion_provider,
        cache_config,
    )?
    .with_completion_model(settings.completion.model.clone());

    if let Some(ref model) = settings.embedding.model_name {
        service = service.with_embedding_model(model.clone());
    }

    if let Some(ref prefix) = settings.completion.prompt_prefix {
        service = service.with_prompt_prefix(prefix.clone());
    }

    service.initialize().await?;

    Ok(service)
}
