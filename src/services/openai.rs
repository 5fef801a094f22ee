use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::services::provider::{LanguageModelProvider, ProviderError};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Chat completion client for OpenAI-compatible endpoints
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModelProvider for OpenAiClient {
    async fn classify(&self, instruction: &str, text: &str) -> Result<String, ProviderError> {
        let prompt = format!("{}\n\nReview: \"{}\"", instruction, text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: 10,
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Language model request: {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(ProviderError::Unauthorized),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                return Err(ProviderError::ApiError(format!("{} - {}", status, body)));
            }
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse completion: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("Completion had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(url: String) -> OpenAiClient {
        OpenAiClient::new(url, "sk-test".to_string(), DEFAULT_MODEL.to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_classify_returns_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJsonString(
                r#"{"model": "gpt-3.5-turbo", "max_tokens": 10, "temperature": 0.0}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": " Positive\n"}}]}"#)
            .create_async()
            .await;

        let label = client(server.url())
            .classify("classify", "Dedicated fryer")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(label, " Positive\n");
    }

    #[tokio::test]
    async fn test_classify_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let result = client(server.url()).classify("classify", "text").await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .create_async()
            .await;

        let result = client(server.url()).classify("classify", "text").await;
        assert!(matches!(result, Err(ProviderError::Unauthorized)));
    }
}
