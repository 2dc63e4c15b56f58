pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

/// Fixed placeholder returned when the provider produced no usable reply.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("upstream body was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a provider call that completed at the transport level.
///
/// The provider may omit any part of its reply path (refusal, safety
/// filtering, empty candidates). Those all decode to `Empty` rather than
/// surfacing as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamReply {
    Text(String),
    Empty,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<UpstreamReply, UpstreamError>;
}
