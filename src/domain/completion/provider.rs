//! Completion provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{CompletionRequest, CompletionResponse};
use crate::domain::DomainError;

/// Trait for completion providers (OpenAI, Anthropic, etc.)
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Generate a completion for the given request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the default model for this provider
    fn default_model(&self) -> &'static str;
}
