// Provider configuration and a factory for building chat clients from it

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::openai::{OpenAIClient, GROQ_API_BASE, OPENAI_API_BASE};
use crate::traits::ChatClient;

/// OpenAI-compatible providers the companion can talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    #[default]
    Groq,
}

impl ProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => OPENAI_API_BASE,
            ProviderType::Groq => GROQ_API_BASE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type", default)]
    pub provider: ProviderType,
    pub api_key: String,
    /// Overrides the provider's default endpoint (proxies, local servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::OpenAI,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::Groq,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }

    pub fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let client = OpenAIClient::with_base_url(config.api_key.clone(), config.endpoint())?;
        tracing::debug!(provider = ?config.provider, endpoint = %client.base_url(), "chat client created");
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groq_is_the_default_provider() {
        assert_eq!(ProviderType::default(), ProviderType::Groq);
        assert_eq!(ProviderConfig::groq("k").endpoint(), GROQ_API_BASE);
    }

    #[test]
    fn base_url_override_wins() {
        let config = ProviderConfig::openai("k").with_base_url("http://localhost:8080/v1");
        assert_eq!(config.provider_type(), ProviderType::OpenAI);
        assert_eq!(config.endpoint(), "http://localhost:8080/v1");
    }

    #[test]
    fn deserializes_with_type_tag() {
        let json = r#"{"type":"openai","api_key":"k"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider_type(), ProviderType::OpenAI);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn factory_builds_client() {
        assert!(ClientFactory::create_chat_client(ProviderConfig::groq("k")).is_ok());
    }
}
