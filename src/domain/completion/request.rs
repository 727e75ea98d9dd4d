//! Completion request types

use serde::{Deserialize, Serialize};

/// Request for a text completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to use
    model: String,
    /// The user query text
    prompt: String,
    /// Optional caller-supplied context for the query
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    /// Optional prefix prepended as the system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_prefix: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            context: None,
            prompt_prefix: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the prompt prefix
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = Some(prefix.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Get the model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Get the context
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Get the prompt prefix
    pub fn prompt_prefix(&self) -> Option<&str> {
        self.prompt_prefix.as_deref()
    }

    /// Get the temperature
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Get the maximum tokens
    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request() {
        let request = CompletionRequest::new("gpt-4", "What is the capital of France?");

        assert_eq!(request.model(), "gpt-4");
        assert_eq!(request.prompt(), "What is the capital of France?");
        assert!(request.context().is_none());
        assert!(request.prompt_prefix().is_none());
    }

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("gpt-4", "query")
            .with_context("earlier conversation")
            .with_prompt_prefix("You are a helpful assistant.")
            .with_temperature(0.2)
            .with_max_tokens(512);

        assert_eq!(request.context(), Some("earlier conversation"));
        assert_eq!(request.prompt_prefix(), Some("You are a helpful assistant."));
        assert_eq!(request.temperature(), Some(0.2));
        assert_eq!(request.max_tokens(), Some(512));
    }
}
