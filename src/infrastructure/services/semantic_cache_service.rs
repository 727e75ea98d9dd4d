//! Semantic LLM response caching service
//!
//! The decision engine: embeds an incoming query, consults the similarity
//! index, serves hits from the store and falls back to the completion
//! provider on a miss, caching the fresh response.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::completion::{CompletionProvider, CompletionRequest};
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::semantic_cache::{
    CacheEntry, CacheStats, EntryStore, SemanticCacheConfig, SimilarityIndex, StatsSnapshot,
};
use crate::domain::DomainError;

/// Where a query response came from
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSource {
    /// Served from the store
    Cache {
        /// Similarity score of the matching entry
        similarity: f32,
    },
    /// Produced by the completion provider
    Completion,
}

/// Outcome of a cache query
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// The response text
    pub response: String,
    /// Hit or miss provenance
    pub source: ResponseSource,
    /// Id of the entry that served (or now stores) the response
    pub entry_id: Option<String>,
}

impl QueryResult {
    /// Whether the response was served from the cache
    pub fn is_cache_hit(&self) -> bool {
        matches!(self.source, ResponseSource::Cache { .. })
    }
}

/// Semantic cache orchestrator
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn EntryStore>,
    index: SimilarityIndex,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    completion_provider: Arc<dyn CompletionProvider>,
    config: SemanticCacheConfig,
    embedding_model: String,
    completion_model: String,
    prompt_prefix: Option<String>,
    stats: CacheStats,
    initialized: AtomicBool,
}

impl SemanticCacheService {
    /// Create a new service over the given collaborators.
    ///
    /// The configuration is validated here; out-of-range values are rejected
    /// rather than clamped.
    pub fn new(
        store: Arc<dyn EntryStore>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        completion_provider: Arc<dyn CompletionProvider>,
        config: SemanticCacheConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let index = SimilarityIndex::new(store.clone(), config.embedding_size);
        let embedding_model = embedding_provider.default_model().to_string();
        let completion_model = completion_provider.default_model().to_string();

        Ok(Self {
            store,
            index,
            embedding_provider,
            completion_provider,
            config,
            embedding_model,
            completion_model,
            prompt_prefix: None,
            stats: CacheStats::new(),
            initialized: AtomicBool::new(false),
        })
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the completion model
    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = model.into();
        self
    }

    /// Set the prompt prefix passed to every completion call
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = Some(prefix.into());
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Verify the collaborators are reachable. Idempotent; a failure leaves
    /// the instance uninitialized so it can be retried.
    pub async fn initialize(&self) -> Result<(), DomainError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }

        self.store
            .ping()
            .await
            .map_err(|e| DomainError::initialization(format!("Entry store unreachable: {}", e)))?;

        self.initialized.store(true, Ordering::Release);
        debug!("Semantic cache initialized");

        Ok(())
    }

    /// Answer a query, serving from the cache when a semantically similar
    /// entry exists and falling back to the completion provider otherwise.
    pub async fn query(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<QueryResult, DomainError> {
        let embedding = self.generate_embedding(text).await?;

        let hit = self
            .index
            .search(&embedding, self.config.similarity_threshold)
            .await?;

        if let Some(hit) = hit {
            self.stats.record_cache_hit();
            debug!(
                "Semantic cache hit with similarity {:.4} for entry {}",
                hit.score,
                hit.entry.id()
            );

            return Ok(QueryResult {
                response: hit.entry.response().to_string(),
                source: ResponseSource::Cache {
                    similarity: hit.score,
                },
                entry_id: Some(hit.entry.id().to_string()),
            });
        }

        self.stats.record_api_hit();
        debug!(
            "Semantic cache miss for query: {}",
            text.chars().take(50).collect::<String>()
        );

        let mut request = CompletionRequest::new(&self.completion_model, text);

        if let Some(context) = context {
            request = request.with_context(context);
        }

        if let Some(ref prefix) = self.prompt_prefix {
            request = request.with_prompt_prefix(prefix);
        }

        let completion = self.completion_provider.complete(request).await?;
        let response = completion.into_text();

        // A zero TTL disables storage entirely
        if self.config.ttl_secs == 0 {
            return Ok(QueryResult {
                response,
                source: ResponseSource::Completion,
                entry_id: None,
            });
        }

        let entry = CacheEntry::new(
            format!("sem:{}", Uuid::new_v4()),
            text,
            embedding,
            response.clone(),
            self.config.ttl(),
        );
        let entry_id = self.store.insert(entry).await?;

        debug!("Cached completion response as {}", entry_id);

        Ok(QueryResult {
            response,
            source: ResponseSource::Completion,
            entry_id: Some(entry_id),
        })
    }

    /// Remove all cached entries. Stats are cumulative and survive a clear.
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.store.clear().await
    }

    /// Number of stored entries
    pub async fn size(&self) -> Result<usize, DomainError> {
        self.store.size().await
    }

    /// Completion-provider invocation count
    pub fn api_hits(&self) -> u64 {
        self.stats.api_hits()
    }

    /// Cache hit count
    pub fn cache_hits(&self) -> u64 {
        self.stats.cache_hits()
    }

    /// Externally-judged correct hit count
    pub fn positive_hits(&self) -> u64 {
        self.stats.positive_hits()
    }

    /// Externally-judged incorrect hit count
    pub fn negative_hits(&self) -> u64 {
        self.stats.negative_hits()
    }

    /// Record an external judgment that a cache hit was correct
    pub fn record_positive_hit(&self) {
        self.stats.record_positive_hit();
    }

    /// Record an external judgment that a cache hit was incorrect
    pub fn record_negative_hit(&self) {
        self.stats.record_negative_hit();
    }

    /// Reset all counters to zero
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Point-in-time copy of the counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.embedding_model, text);
        let response = self.embedding_provider.embed(request).await?;

        let vector = response
            .first()
            .map(|e| e.vector().to_vec())
            .ok_or_else(|| {
                DomainError::embedding(
                    self.embedding_provider.provider_name(),
                    "No embedding returned",
                )
            })?;

        // Enforce the instance-wide vector length at the provider boundary
        if vector.len() != self.config.embedding_size {
            return Err(DomainError::dimension_mismatch(
                self.config.embedding_size,
                vector.len(),
            ));
        }

        Ok(vector)
    }
}

/// Trait for semantic cache service operations, for hosts that mock the
/// whole engine
#[async_trait]
pub trait SemanticCacheServiceTrait: Send + Sync + std::fmt::Debug {
    /// Verify the collaborators are reachable
    async fn initialize(&self) -> Result<(), DomainError>;

    /// Answer a query through the cache
    async fn query(&self, text: &str, context: Option<&str>) -> Result<QueryResult, DomainError>;

    /// Remove all cached entries
    async fn clear_cache(&self) -> Result<(), DomainError>;

    /// Point-in-time copy of the counters
    fn stats(&self) -> StatsSnapshot;

    /// Record an external judgment that a cache hit was correct
    fn record_positive_hit(&self);

    /// Record an external judgment that a cache hit was incorrect
    fn record_negative_hit(&self);
}

#[async_trait]
impl SemanticCacheServiceTrait for SemanticCacheService {
    async fn initialize(&self) -> Result<(), DomainError> {
        SemanticCacheService::initialize(self).await
    }

    async fn query(&self, text: &str, context: Option<&str>) -> Result<QueryResult, DomainError> {
        SemanticCacheService::query(self, text, context).await
    }

    async fn clear_cache(&self) -> Result<(), DomainError> {
        SemanticCacheService::clear_cache(self).await
    }

    fn stats(&self) -> StatsSnapshot {
        SemanticCacheService::stats(self)
    }

    fn record_positive_hit(&self) {
        SemanticCacheService::record_positive_hit(self)
    }

    fn record_negative_hit(&self) {
        SemanticCacheService::record_negative_hit(self)
    }
}
