use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use mindease_llm::{ChatClient, ChatOptions, ChatRequest, ClientFactory, Message, ProviderConfig, StreamEvent};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Per call-site sampling limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionSettings {
    /// Interactive chat replies
    pub const CHAT: Self = Self {
        max_tokens: 500,
        temperature: 0.7,
    };

    /// Single-shot journal prompt generation
    pub const JOURNAL_PROMPT: Self = Self {
        max_tokens: 100,
        temperature: 0.8,
    };

    fn options(&self) -> ChatOptions {
        ChatOptions::new()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// No credential: raised before any network I/O
    #[error("GROQ_API_KEY is not set – add it to your environment")]
    NotConfigured,

    #[error("Upstream completion failed: {0}")]
    Upstream(anyhow::Error),
}

impl GatewayError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, GatewayError::NotConfigured)
    }
}

/// Text fragments of one model reply, in arrival order
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

/// Front door to the external model endpoint.
///
/// An unconfigured gateway holds no client at all, so it cannot reach the
/// network by construction.
#[derive(Clone)]
pub struct CompletionGateway {
    client: Option<Arc<dyn ChatClient>>,
    model: String,
}

impl CompletionGateway {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            model: model.into(),
        }
    }

    pub fn unconfigured(model: impl Into<String>) -> Self {
        Self {
            client: None,
            model: model.into(),
        }
    }

    /// Build from an optional credential; a blank one counts as missing
    pub fn from_credential(
        api_key: Option<String>,
        base_url: Option<String>,
        model: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let model = model.into();

        let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
            tracing::warn!(model = %model, "Model credential missing, completions disabled");
            return Ok(Self::unconfigured(model));
        };

        let mut provider = ProviderConfig::groq(api_key);
        if let Some(base_url) = base_url {
            provider = provider.with_base_url(base_url);
        }

        tracing::info!(model = %model, endpoint = %provider.endpoint(), "Completion gateway configured");
        let client = ClientFactory::create_chat_client(provider)?;
        Ok(Self::new(client, model))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> Result<&Arc<dyn ChatClient>, GatewayError> {
        self.client.as_ref().ok_or(GatewayError::NotConfigured)
    }

    fn request(&self, messages: Vec<Message>, settings: CompletionSettings) -> ChatRequest {
        ChatRequest::new(self.model.clone(), messages).with_options(settings.options())
    }

    /// Stream a reply. `messages` must already start with the system prompt.
    ///
    /// Output is passed through untouched; a transport failure ends the
    /// stream with an `Upstream` item and nothing is retried here.
    pub async fn stream(
        &self,
        messages: Vec<Message>,
        settings: CompletionSettings,
    ) -> Result<FragmentStream, GatewayError> {
        let client = self.client()?;

        let events = client
            .chat_stream(self.request(messages, settings))
            .await
            .map_err(GatewayError::Upstream)?;

        let fragments = events.filter_map(|event| async move {
            match event {
                Ok(StreamEvent::Message { content }) => Some(Ok(content)),
                Ok(StreamEvent::Done { finish_reason }) => {
                    if finish_reason.as_deref() == Some("length") {
                        tracing::warn!("Reply cut at the max_tokens limit");
                    }
                    None
                }
                Err(e) => Some(Err(GatewayError::Upstream(e))),
            }
        });

        Ok(Box::pin(fragments))
    }

    /// One-shot completion of `instruction` under `system_prompt`
    pub async fn generate(
        &self,
        system_prompt: &str,
        instruction: &str,
        settings: CompletionSettings,
    ) -> Result<String, GatewayError> {
        let client = self.client()?;

        let messages = vec![Message::system(system_prompt), Message::human(instruction)];
        let response = client
            .chat(self.request(messages, settings))
            .await
            .map_err(GatewayError::Upstream)?;

        if response.finish_reason.as_deref() == Some("length") {
            tracing::warn!("Generated text cut at the max_tokens limit");
        }
        Ok(response.content.unwrap_or_default())
    }
}
