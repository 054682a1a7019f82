use anyhow::Result;
use async_trait::async_trait;

/// Text-completion collaborator
///
/// Implementations make exactly one upstream call per `complete`. Timeouts and
/// fallbacks are the caller's concern.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Stand-in used when no completion backend is configured
pub struct DisabledCompletionClient;

#[async_trait]
impl CompletionClient for DisabledCompletionClient {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("No completion backend configured")
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
