// Client for OpenAI-compatible chat completion endpoints (OpenAI, Groq)

use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, EventStream};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// HTTP client speaking the `/chat/completions` protocol directly (no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create a client for api.openai.com
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// Create a client for Groq's OpenAI-compatible endpoint
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, GROQ_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value> {
        let mut request = serde_json::json!({
            "model": model,
            "messages": messages.iter().map(Self::convert_message).collect::<Vec<_>>(),
            "stream": stream,
        });

        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }

        Ok(request)
    }

    /// Plain `{role, content}` objects; every compatible provider accepts these
    fn convert_message(message: &Message) -> Value {
        serde_json::json!({
            "role": message.role(),
            "content": message.text(),
        })
    }

    async fn post_completions(&self, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "completion endpoint rejected request");
            anyhow::bail!("Completion API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            false,
        )?;

        let raw: OpenAIChatResponse = self
            .post_completions(&payload)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(match raw.choices.into_iter().next() {
            Some(choice) => ChatResponse {
                content: choice.message.content,
                finish_reason: choice.finish_reason,
            },
            None => ChatResponse::default(),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            true,
        )?;

        let response = self.post_completions(&payload).await?;
        Ok(parse_chat_sse_stream(response))
    }
}

// ============================================================================
// WIRE TYPES (non-streaming chat completions)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_sampling_options() {
        let client = OpenAIClient::groq("test-key").unwrap();
        let payload = client
            .build_chat_request(
                "llama3-70b-8192",
                vec![Message::system("be kind"), Message::human("hi")],
                &ChatOptions::new().temperature(0.7).max_tokens(500),
                true,
            )
            .unwrap();

        assert_eq!(payload["model"], "llama3-70b-8192");
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["max_tokens"], 500);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hi");
        assert!((payload["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn unset_options_are_omitted() {
        let client = OpenAIClient::new("k").unwrap();
        let payload = client
            .build_chat_request("m", vec![Message::human("hi")], &ChatOptions::default(), false)
            .unwrap();

        assert!(payload.get("temperature").is_none());
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OpenAIClient::with_base_url("k", "http://localhost:1234/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }
}
