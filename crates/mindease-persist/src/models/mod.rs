mod profile;
mod record;

pub use profile::{ProfileUpdate, UserProfile};
pub use record::{
    select_recent, ChatPayload, ChatRole, JournalPayload, MoodPayload, Record, RecordPayload,
    SortOrder,
};
