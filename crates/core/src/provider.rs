//! Seam between the orchestrator and the text-generation provider.

use async_trait::async_trait;

/// Sampling knobs forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
}

/// A single chat-style completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub sampling: SamplingParams,
}

/// Failure of one provider call. Never surfaced to HTTP callers; the
/// orchestrator converts it into a fallback record.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport, status or decoding failure.
    #[error("Provider request failed: {0}")]
    Request(String),

    /// The provider answered but without any message content.
    #[error("Provider returned no content")]
    EmptyResponse,

    /// The call did not complete within the configured deadline.
    #[error("Provider call timed out after {0} seconds")]
    Timeout(u64),
}

/// A chat-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Execute one completion and return the raw message text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Model identifier, recorded alongside persisted batches.
    fn model(&self) -> &str;
}
