//! Cache entry type

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Current time as unix seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A cached entry in the semantic cache
///
/// Entries are immutable after creation; they age out via TTL or are removed
/// by an explicit clear or eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unique identifier, assigned at insertion
    id: String,
    /// The original query text, kept for diagnostics and evaluation
    query_text: String,
    /// The embedding vector used for similarity search
    embedding: Vec<f32>,
    /// The cached response text
    response: String,
    /// When this entry was created (unix seconds)
    created_at: u64,
    /// Effective lifetime in seconds
    ttl_secs: u64,
}

impl CacheEntry {
    /// Create a new cache entry
    pub fn new(
        id: impl Into<String>,
        query_text: impl Into<String>,
        embedding: Vec<f32>,
        response: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            query_text: query_text.into(),
            embedding,
            response: response.into(),
            created_at: unix_now(),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Get the entry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the original query text
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Get the embedding vector
    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    /// Get the cached response
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Get the creation timestamp (unix seconds)
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Get the TTL in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Check whether the entry is expired at the given time
    pub fn is_expired_at(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) > self.ttl_secs
    }

    /// Check whether the entry is expired now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    #[cfg(test)]
    pub(crate) fn with_created_at(mut self, created_at: u64) -> Self {
        self.created_at = created_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let embedding = vec![0.1, 0.2, 0.3];
        let entry = CacheEntry::new(
            "sem:test-1",
            "hello world",
            embedding.clone(),
            "a response",
            Duration::from_secs(3600),
        );

        assert_eq!(entry.id(), "sem:test-1");
        assert_eq!(entry.query_text(), "hello world");
        assert_eq!(entry.embedding(), &embedding);
        assert_eq!(entry.response(), "a response");
        assert_eq!(entry.ttl_secs(), 3600);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiry_boundary() {
        let entry = CacheEntry::new(
            "sem:test-1",
            "query",
            vec![0.1],
            "value",
            Duration::from_secs(10),
        );
        let t0 = entry.created_at();

        // Expired strictly after created_at + ttl
        assert!(!entry.is_expired_at(t0 + 10));
        assert!(entry.is_expired_at(t0 + 11));
    }

    #[test]
    fn test_entry_zero_ttl() {
        let entry = CacheEntry::new(
            "sem:test-1",
            "query",
            vec![0.1],
            "value",
            Duration::from_secs(0),
        );
        let t0 = entry.created_at();

        assert!(!entry.is_expired_at(t0));
        assert!(entry.is_expired_at(t0 + 1));
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = CacheEntry::new(
            "sem:test-1",
            "query",
            vec![0.25, -0.5],
            "value",
            Duration::from_secs(60),
        );

        let json = serde_json::to_string(&entry).unwrap();
        let restored: CacheEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id(), entry.id());
        assert_eq!(restored.embedding(), entry.embedding());
        assert_eq!(restored.created_at(), entry.created_at());
    }
}
