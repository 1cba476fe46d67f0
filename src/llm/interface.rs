use async_trait::async_trait;

/// Interface for a stateless chat-completion provider.
/// Each call is a single-turn exchange: one prompt in, one generated text out.
#[async_trait]
pub trait ChatCompletionInterface: Send + Sync {
    /// Send `prompt` as the user message and return the first choice's content
    async fn complete(&self, prompt: &str) -> Result<String, anyhow::Error>;
}
