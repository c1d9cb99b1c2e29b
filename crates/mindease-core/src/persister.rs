use std::sync::Arc;

use mindease_persist::{ChatPayload, RecordStore, SortOrder};
use tokio::task::JoinHandle;

use crate::session::ConversationTurn;

/// Durable transcript writer.
///
/// Writes are best-effort: each runs on its own task, and a failure is
/// logged and dropped. Callers never wait on a write before moving on.
#[derive(Clone)]
pub struct TranscriptPersister {
    store: Arc<dyn RecordStore<ChatPayload>>,
}

impl TranscriptPersister {
    pub fn new(store: Arc<dyn RecordStore<ChatPayload>>) -> Self {
        Self { store }
    }

    /// Append one turn for `uid` in the background.
    ///
    /// The record keeps the turn's own `created_at`, so the durable log
    /// follows append order however the detached writes interleave.
    /// Must be called from within a tokio runtime. The returned handle only
    /// exists so tests can wait for the write; production callers drop it.
    pub fn record(&self, uid: &str, turn: &ConversationTurn) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let uid = uid.to_string();
        let role = turn.role;
        let created_at = turn.created_at;
        let payload = ChatPayload {
            role,
            content: turn.content.clone(),
        };

        tokio::spawn(async move {
            match store.append_at(&uid, created_at, payload).await {
                Ok(record) => {
                    tracing::debug!(uid = %uid, role = role.as_str(), id = %record.id, "Transcript turn saved");
                }
                Err(e) => {
                    tracing::error!(uid = %uid, role = role.as_str(), error = %e, "Failed to save transcript turn");
                }
            }
        })
    }

    /// The `limit` most recent turns of `uid`, in `order`
    pub async fn history(
        &self,
        uid: &str,
        limit: usize,
        order: SortOrder,
    ) -> mindease_persist::Result<Vec<ConversationTurn>> {
        let records = self.store.list(uid, limit, order).await?;
        Ok(records.into_iter().map(ConversationTurn::from).collect())
    }
}
