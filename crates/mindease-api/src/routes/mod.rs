pub mod health;
pub mod history;
pub mod journal;
pub mod journal_prompt;
pub mod mood;
pub mod openapi;
pub mod profile;
pub mod therapists;
