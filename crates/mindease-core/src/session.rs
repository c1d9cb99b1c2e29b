use chrono::{DateTime, Utc};
use mindease_llm::Message;
use mindease_persist::{ChatPayload, ChatRole, Record};
use serde::{Deserialize, Serialize};

use crate::persister::TranscriptPersister;
use crate::prompt::welcome_message;

/// One message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Message {
        match self.role {
            ChatRole::User => Message::human(self.content.clone()),
            ChatRole::Assistant => Message::ai(self.content.clone()),
        }
    }
}

impl From<Record<ChatPayload>> for ConversationTurn {
    fn from(record: Record<ChatPayload>) -> Self {
        Self {
            role: record.payload.role,
            content: record.payload.content,
            created_at: record.created_at,
        }
    }
}

/// Where appended turns are durably recorded
#[derive(Clone)]
struct SessionSink {
    persister: TranscriptPersister,
    uid: String,
}

/// Ordered, in-memory turn history for one active conversation.
///
/// Appending is the only mutation. When a sink is attached every appended
/// turn is handed to the [`TranscriptPersister`] without waiting for the
/// write; the in-memory sequence never depends on its outcome.
#[derive(Clone)]
pub struct ConversationSession {
    welcome: Option<ConversationTurn>,
    turns: Vec<ConversationTurn>,
    sink: Option<SessionSink>,
}

impl ConversationSession {
    /// Fresh session seeded with the (never persisted) welcome turn
    pub fn new(display_name: Option<&str>) -> Self {
        let welcome = ConversationTurn::assistant(welcome_message(display_name));
        Self {
            turns: vec![welcome.clone()],
            welcome: Some(welcome),
            sink: None,
        }
    }

    /// Rebuild a session from turns that were already recorded elsewhere
    pub fn restore(turns: impl IntoIterator<Item = ConversationTurn>) -> Self {
        Self {
            welcome: None,
            turns: turns.into_iter().collect(),
            sink: None,
        }
    }

    /// Record every future append for `uid`
    pub fn with_persistence(mut self, persister: TranscriptPersister, uid: impl Into<String>) -> Self {
        self.sink = Some(SessionSink {
            persister,
            uid: uid.into(),
        });
        self
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        if let Some(sink) = &self.sink {
            // Detached; the handle is dropped on purpose.
            let _ = sink.persister.record(&sink.uid, &turn);
        }
        self.turns.push(turn);
    }

    pub fn current_turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Back to the seeded state; nothing already persisted is touched
    pub fn reset(&mut self) {
        self.turns.clear();
        if let Some(welcome) = &self.welcome {
            self.turns.push(welcome.clone());
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.sink.as_ref().map(|s| s.uid.as_str())
    }

    /// System prompt followed by every turn, in order
    pub fn to_messages(&self, system_prompt: impl Into<String>) -> Vec<Message> {
        std::iter::once(Message::system(system_prompt.into()))
            .chain(self.turns.iter().map(ConversationTurn::to_message))
            .collect()
    }
}
