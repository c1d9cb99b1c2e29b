use std::sync::Arc;

use mindease_core::{ChatEngine, CompletionGateway, TranscriptPersister};
use mindease_persist::{
    ChatPayload, JournalPayload, MongoPersistenceClient, MoodPayload, ProfileStore, RecordStore,
};

use crate::config::Config;

/// Which durable store is wired in
#[derive(Clone)]
pub enum StoreBackend {
    Memory,
    Mongo(Arc<MongoPersistenceClient>),
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Mongo(_) => "mongodb",
        }
    }
}

/// Shared application state passed to all handlers
///
/// One store object backs every collection; it is held once per trait so
/// handlers only see the contract they use.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: ChatEngine,
    pub persister: TranscriptPersister,
    pub profiles: Arc<dyn ProfileStore>,
    pub journal: Arc<dyn RecordStore<JournalPayload>>,
    pub moods: Arc<dyn RecordStore<MoodPayload>>,
    pub backend: StoreBackend,
}

impl AppState {
    pub fn new<S>(config: Config, gateway: CompletionGateway, store: Arc<S>, backend: StoreBackend) -> Self
    where
        S: ProfileStore
            + RecordStore<ChatPayload>
            + RecordStore<JournalPayload>
            + RecordStore<MoodPayload>
            + 'static,
    {
        let chats: Arc<dyn RecordStore<ChatPayload>> = store.clone();

        Self {
            config: Arc::new(config),
            engine: ChatEngine::new(gateway),
            persister: TranscriptPersister::new(chats),
            profiles: store.clone(),
            journal: store.clone(),
            moods: store,
            backend,
        }
    }
}
