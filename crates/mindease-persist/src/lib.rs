pub mod models;
pub mod error;
pub mod trait_client;
pub mod memory;
pub mod dbs;

pub use models::{
    ChatPayload, ChatRole, JournalPayload, MoodPayload, ProfileUpdate, Record, RecordPayload,
    SortOrder, UserProfile,
};
pub use error::{PersistError, Result};
pub use trait_client::{ProfileStore, RecordStore};
pub use memory::MemoryStore;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
