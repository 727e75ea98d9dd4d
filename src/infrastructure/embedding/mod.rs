//! Embedding provider implementations

mod factory;
mod local;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use local::LocalEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
