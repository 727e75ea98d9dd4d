//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the semantic cache engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Similarity threshold for cache hits (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Time-to-live for cached entries in seconds; 0 disables storage,
    /// turning every query into a miss
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Length of every embedding vector in this cache instance
    #[serde(default = "default_embedding_size")]
    pub embedding_size: usize,

    /// Optional capacity bound; entries beyond it are evicted
    #[serde(default)]
    pub max_entries: Option<usize>,
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

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            ttl_secs: default_ttl_secs(),
            embedding_size: default_embedding_size(),
            max_entries: None,
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    /// Set the embedding size
    pub fn with_embedding_size(mut self, size: usize) -> Self {
        self.embedding_size = size;
        self
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Validate the configuration, rejecting out-of-range values
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold)
            || !self.similarity_threshold.is_finite()
        {
            return Err(DomainError::configuration(format!(
                "similarity_threshold must be in [0.0, 1.0], got {}",
                self.similarity_threshold
            )));
        }

        if self.embedding_size == 0 {
            return Err(DomainError::configuration(
                "embedding_size must be greater than 0",
            ));
        }

        if self.max_entries == Some(0) {
            return Err(DomainError::configuration(
                "max_entries must be greater than 0 when set",
            ));
        }

        Ok(())
    }
}
