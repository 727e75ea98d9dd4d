//! Domain layer - Core business logic and entities

pub mod completion;
pub mod embedding;
pub mod error;
pub mod semantic_cache;

pub use completion::{CompletionProvider, CompletionRequest, CompletionResponse, CompletionUsage};
pub use embedding::{
    cosine_similarity, Embedding, EmbeddingInput, EmbeddingProvider, EmbeddingRequest,
    EmbeddingResponse, EmbeddingUsage,
};
pub use error::DomainError;
pub use semantic_cache::{
    CacheEntry, CacheStats, EntryStore, EvictionPolicy, OldestInserted, SearchHit,
    SemanticCacheConfig, SimilarityIndex, StatsSnapshot,
};
