pub mod app_config;

pub use app_config::{
    AppSettings, CacheOptions, CompletionSettings, EmbeddingProviderKind, EmbeddingSettings,
    LogFormat, LoggingSettings,
};
