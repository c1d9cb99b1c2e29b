use std::pin::Pin;

use futures::{Stream, StreamExt};
use mindease_persist::ChatRole;
use thiserror::Error;

use crate::gateway::{CompletionGateway, CompletionSettings, GatewayError};
use crate::prompt::{compose_chat_prompt, ProfileProjection};
use crate::session::{ConversationSession, ConversationTurn};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message must not be empty")]
    EmptyInput,

    #[error("No unanswered message to retry")]
    NothingToRetry,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Reply fragments; holds the session until the reply is finished or dropped
pub type ReplyStream<'a> = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send + 'a>>;

/// Drives one conversational round-trip over a [`ConversationSession`].
///
/// The user turn is appended before the model is called. The assistant turn
/// is appended only once the stream finishes cleanly, so an upstream failure
/// or an abandoned stream leaves the user turn unanswered and retryable.
#[derive(Clone)]
pub struct ChatEngine {
    gateway: CompletionGateway,
}

impl ChatEngine {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &CompletionGateway {
        &self.gateway
    }

    pub async fn reply<'a>(
        &self,
        session: &'a mut ConversationSession,
        profile: Option<&ProfileProjection>,
        input: &str,
    ) -> Result<ReplyStream<'a>, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if !self.gateway.is_configured() {
            return Err(GatewayError::NotConfigured.into());
        }

        session.append(ConversationTurn::user(input));
        self.complete(session, profile).await
    }

    /// Re-run the completion for a trailing unanswered user turn
    pub async fn retry<'a>(
        &self,
        session: &'a mut ConversationSession,
        profile: Option<&ProfileProjection>,
    ) -> Result<ReplyStream<'a>, ChatError> {
        let unanswered = matches!(session.last_turn(), Some(turn) if turn.role == ChatRole::User);
        if !unanswered {
            return Err(ChatError::NothingToRetry);
        }
        self.complete(session, profile).await
    }

    async fn complete<'a>(
        &self,
        session: &'a mut ConversationSession,
        profile: Option<&ProfileProjection>,
    ) -> Result<ReplyStream<'a>, ChatError> {
        let messages = session.to_messages(compose_chat_prompt(profile));
        let mut fragments = self.gateway.stream(messages, CompletionSettings::CHAT).await?;

        let replies = async_stream::stream! {
            let mut reply = String::new();
            let mut failed = false;

            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(text) => {
                        reply.push_str(&text);
                        yield Ok(text);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Reply stream aborted, assistant turn not recorded");
                        failed = true;
                        yield Err(ChatError::from(e));
                        break;
                    }
                }
            }

            if !failed {
                if reply.is_empty() {
                    tracing::warn!("Model returned an empty reply");
                } else {
                    session.append(ConversationTurn::assistant(reply));
                }
            }
        };

        Ok(Box::pin(replies))
    }
}
