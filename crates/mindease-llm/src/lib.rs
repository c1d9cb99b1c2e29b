pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod openai;
pub mod config;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, EventStream};

pub use streaming::StreamEvent;
pub use buffer_utils::CircularLineBuffer;
pub use openai::OpenAIClient;
pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use types::Message;
