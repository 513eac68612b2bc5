//! Generator trait — the abstraction over token-streaming LLM backends.
//!
//! A Generator knows how to take one fully-rendered prompt and produce the
//! answer as a stream of token chunks. The pipeline relays those chunks to
//! its caller without ever seeing provider wire formats.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// One generation request: a rendered prompt plus sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The complete prompt text (instructions + transcript + evidence +
    /// question, already substituted).
    pub prompt: String,

    /// Sampling temperature (0.0 = deterministic).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.5
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenChunk {
    /// Partial content delta. `None` or empty for keep-alive/final frames.
    #[serde(default)]
    pub text: Option<String>,

    /// Whether this is the final chunk.
    #[serde(default)]
    pub done: bool,
}

impl TokenChunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            done: false,
        }
    }

    pub fn done() -> Self {
        Self {
            text: None,
            done: true,
        }
    }
}

/// The token-producing capability.
///
/// Each call to `stream()` starts a fresh generation — streams are not
/// restartable. Dropping the returned receiver cancels the generation; the
/// implementation must stop producing and release its connection promptly.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g. "groq", "openai").
    fn name(&self) -> &str;

    /// Open a token stream for the given request.
    ///
    /// A failure to open the stream is returned directly; failures mid-stream
    /// arrive as `Err` items on the channel and terminate it.
    async fn stream(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<TokenChunk, GenerationError>>,
        GenerationError,
    >;

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("Who are you?");
        assert!((req.temperature - 0.5).abs() < f32::EPSILON);
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn chunk_constructors() {
        let c = TokenChunk::text("hi");
        assert_eq!(c.text.as_deref(), Some("hi"));
        assert!(!c.done);

        let d = TokenChunk::done();
        assert!(d.text.is_none());
        assert!(d.done);
    }
}
