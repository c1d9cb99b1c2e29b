pub mod templates;
pub mod prompt;
pub mod session;
pub mod gateway;
pub mod persister;
pub mod chat;
pub mod auth;
pub mod wellness;

pub use prompt::{compose_chat_prompt, compose_journal_prompt, welcome_message, ProfileProjection};
pub use session::{ConversationSession, ConversationTurn};
pub use gateway::{CompletionGateway, CompletionSettings, FragmentStream, GatewayError, DEFAULT_MODEL};
pub use persister::TranscriptPersister;
pub use chat::{ChatEngine, ChatError, ReplyStream};
pub use auth::AuthSession;
pub use wellness::{
    analyze_sentiment, mood_suggestion, therapists, MoodLevel, Sentiment, Therapist, MOOD_SCALE,
};

pub use mindease_persist::{ChatRole, SortOrder};
