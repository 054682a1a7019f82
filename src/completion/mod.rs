pub mod client;
pub mod openai;

pub use client::{CompletionClient, DisabledCompletionClient};
pub use openai::OpenAiCompletionClient;
