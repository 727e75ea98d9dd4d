//! Completion provider speaking the OpenAI chat-completions wire format

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::completion::{
    CompletionProvider, CompletionRequest, CompletionResponse, CompletionUsage,
};
use crate::domain::DomainError;
use crate::infrastructure::http::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI completion provider
#[derive(Debug)]
pub struct OpenAiCompletionProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiCompletionProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut messages: Vec<OpenAiMessage> = Vec::new();

        if let Some(prefix) = request.prompt_prefix() {
            messages.push(OpenAiMessage {
                role: "system".to_string(),
                content: prefix.to_string(),
            });
        }

        // Caller-supplied context rides along as a separate user turn so the
        // model sees it before the query itself
        if let Some(context) = request.context() {
            messages.push(OpenAiMessage {
                role: "user".to_string(),
                content: format!("Context:\n{}", context),
            });
        }

        messages.push(OpenAiMessage {
            role: "user".to_string(),
            content: request.prompt().to_string(),
        });

        let mut body = serde_json::json!({
            "model": request.model(),
            "messages": messages,
        });

        if let Some(temp) = request.temperature() {
            body["temperature"] = serde_json::json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens() {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<CompletionResponse, DomainError> {
        let response: OpenAiChatResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::completion("openai", format!("Failed to parse response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::completion("openai", "No choices in response"))?;

        let mut completion = CompletionResponse::new(
            response.id,
            response.model,
            choice.message.content.unwrap_or_default(),
        );

        if let Some(usage) = response.usage {
            completion = completion.with_usage(CompletionUsage::new(
                usage.prompt_tokens,
                usage.completion_tokens,
            ));
        }

        Ok(completion)
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for OpenAiCompletionProvider<C> {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| DomainError::completion("openai", e.to_string()))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &'static str {
        "gpt-4o-mini"
    }
}

// OpenAI API types

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    id: String,
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn create_mock_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 12,
                "completion_tokens": 3,
                "total_tokens": 15
            }
        })
    }

    #[tokio::test]
    async fn test_complete() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response("Paris"));
        let provider = OpenAiCompletionProvider::new(client, "test-api-key");

        let request = CompletionRequest::new("gpt-4", "What is the capital of France?");
        let response = provider.complete(request).await.unwrap();

        assert_eq!(response.id(), "chatcmpl-123");
        assert_eq!(response.text(), "Paris");
        assert_eq!(response.usage().unwrap().total_tokens(), 15);
    }

    #[tokio::test]
    async fn test_complete_error_surfaces_as_completion_failure() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded");
        let provider = OpenAiCompletionProvider::new(client, "test-api-key");

        let request = CompletionRequest::new("gpt-4", "Hello");
        let result = provider.complete(request).await;

        assert!(matches!(result, Err(DomainError::Completion { .. })));
    }

    #[test]
    fn test_build_request_message_order() {
        let client = MockHttpClient::new();
        let provider = OpenAiCompletionProvider::new(client, "test-key");

        let request = CompletionRequest::new("gpt-4", "the query")
            .with_prompt_prefix("You are terse.")
            .with_context("prior facts");
        let body = provider.build_request(&request);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are terse.");
        assert_eq!(messages[1]["content"], "Context:\nprior facts");
        assert_eq!(messages[2]["content"], "the query");
    }

    #[test]
    fn test_build_request_without_prefix_or_context() {
        let client = MockHttpClient::new();
        let provider = OpenAiCompletionProvider::new(client, "test-key");

        let request = CompletionRequest::new("gpt-4", "the query");
        let body = provider.build_request(&request);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }
}
