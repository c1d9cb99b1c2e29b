use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use mindease_core::{ChatError, ConversationSession, ConversationTurn, ProfileProjection};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    middleware::MaybeIdentity,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatMessageInput {
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatStreamRequest {
    pub messages: Vec<ChatMessageInput>,
    /// Profile projection; malformed fields are ignored
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_data: Option<serde_json::Value>,
}

/// Split the client transcript into prior turns and the new user input
fn split_history(messages: Vec<ChatMessageInput>) -> ApiResult<(Vec<ConversationTurn>, String)> {
    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        let turn = match message.role.as_str() {
            "user" => ConversationTurn::user(message.content),
            "assistant" => ConversationTurn::assistant(message.content),
            other => {
                return Err(ApiError::BadRequest(format!("Unsupported role: {}", other)));
            }
        };
        turns.push(turn);
    }

    match turns.pop() {
        Some(last) if last.role == mindease_core::ChatRole::User && !last.content.trim().is_empty() => {
            Ok((turns, last.content))
        }
        Some(_) => Err(ApiError::BadRequest(
            "Last message must be a non-empty user message".to_string(),
        )),
        None => Err(ApiError::BadRequest("Messages must not be empty".to_string())),
    }
}

fn sse_event(name: &str, data: serde_json::Value) -> Event {
    Event::default().event(name).data(data.to_string())
}

/// Stream a companion reply using Server-Sent Events
///
/// Events: `message` (`{content}`) per fragment, then `done` or `error`.
/// Authenticated callers get both turns recorded in the background.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatStreamRequest,
    responses(
        (status = 200, description = "Streaming response", content_type = "text/event-stream"),
        (status = 400, description = "Malformed history"),
        (status = 500, description = "Error processing chat request", content_type = "text/plain"),
        (status = 503, description = "Model credential not configured", content_type = "text/plain")
    ),
    tag = "chat"
)]
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    MaybeIdentity(identity): MaybeIdentity,
    Json(req): Json<ChatStreamRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    // 1. Fail fast without a credential, before looking at anything else
    if !state.engine.gateway().is_configured() {
        return Err(ApiError::NotConfigured);
    }

    // 2. Validate the transcript
    let (history, input) = split_history(req.messages)?;
    let profile = req.user_data.as_ref().map(ProfileProjection::from_value);

    // 3. Rebuild the session; only the new turns get recorded
    let mut session = ConversationSession::restore(history);
    if let Some(identity) = &identity {
        session = session.with_persistence(state.persister.clone(), identity.uid.clone());
    }

    // 4. Producer task owns the session for the whole reply
    let (tx, rx) = mpsc::channel::<Event>(100);
    let (started_tx, started_rx) = oneshot::channel::<Result<(), ChatError>>();
    let engine = state.engine.clone();

    tokio::spawn(async move {
        let mut stream = match engine.reply(&mut session, profile.as_ref(), &input).await {
            Ok(stream) => {
                let _ = started_tx.send(Ok(()));
                stream
            }
            Err(e) => {
                let _ = started_tx.send(Err(e));
                return;
            }
        };

        while let Some(fragment) = stream.next().await {
            let event = match fragment {
                Ok(content) => sse_event("message", json!({ "content": content })),
                Err(e) => {
                    tracing::error!("Chat stream error: {}", e);
                    let _ = tx
                        .send(sse_event("error", json!({ "error": "Error processing chat request" })))
                        .await;
                    return;
                }
            };

            if tx.send(event).await.is_err() {
                // Client went away: stop consuming, the reply is not recorded
                tracing::info!("Client disconnected mid-stream");
                return;
            }
        }
        drop(stream);

        let _ = tx.send(sse_event("done", json!({ "status": "completed" }))).await;
    });

    // 5. Surface failures that happen before the first byte as plain HTTP errors
    match started_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(ApiError::Internal),
    }

    let sse_stream = ReceiverStream::new(rx).map(Ok::<Event, Infallible>);

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}
