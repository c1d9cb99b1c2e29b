pub mod chat_stream;
