//! Text-completion provider trait and its error type

use async_trait::async_trait;
use std::time::Duration;

/// Longest provider error body kept for logs
const MAX_ERROR_BODY: usize = 512;

/// A single-shot text-completion service
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name used in logs and metrics
    fn name(&self) -> &str;

    /// Whether the provider can be called at all (credential configured)
    fn is_available(&self) -> bool;

    /// Complete the prompt, producing at most `max_output_tokens` tokens
    async fn complete(&self, prompt: &str, max_output_tokens: u32)
        -> Result<String, ProviderError>;
}

/// Failure of a provider call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport or decoding failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried no completion text
    #[error("provider returned no completion text")]
    EmptyCompletion,

    /// No response within the deadline
    #[error("provider did not respond within {0:?}")]
    Timeout(Duration),

    /// Called without a credential
    #[error("provider is not configured")]
    NotConfigured,
}

impl ProviderError {
    /// Status error with the body truncated for logging
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        Self::Status { status, body }
    }
}
