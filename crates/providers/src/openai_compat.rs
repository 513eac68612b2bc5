//! OpenAI-compatible generator implementation.
//!
//! Works with: Groq, OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any
//! endpoint exposing an OpenAI-compatible `/chat/completions` route.
//!
//! Supports streaming SSE chat completions and health checks.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use standin_core::error::GenerationError;
use standin_core::generator::{GenerationRequest, Generator, TokenChunk};

/// An OpenAI-compatible streaming generator.
///
/// The whole rendered prompt travels as a single user message, matching how
/// the pipeline folds history and evidence into the prompt text itself.
pub struct OpenAiCompatGenerator {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatGenerator {
    /// Create a new OpenAI-compatible generator.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| GenerationError::NotConfigured(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OpenAiCompatGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<TokenChunk, GenerationError>>,
        GenerationError,
    > {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [ApiMessage {
                role: "user".into(),
                content: request.prompt,
            }],
            "temperature": request.temperature,
            "stream": true,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(generator = %self.name, model = %self.model, "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GenerationError::RateLimited {
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if status == 401 || status == 403 {
            return Err(GenerationError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Generator returned error");
            return Err(GenerationError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        let generator_name = self.name.clone();

        // Spawn task to read the SSE byte stream and parse chunks
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(GenerationError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                // Append new bytes to our line buffer
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Process complete lines
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim_end_matches('\r').to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    // Skip empty lines and SSE comments
                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    // Handle "data: ..." lines
                    if let Some(data) = line.strip_prefix("data: ") {
                        let data = data.trim();

                        // "[DONE]" signals end of stream
                        if data == "[DONE]" {
                            let _ = tx.send(Ok(TokenChunk::done())).await;
                            return;
                        }

                        match serde_json::from_str::<StreamResponse>(data) {
                            Ok(stream_resp) => {
                                if let Some(choice) = stream_resp.choices.first()
                                    && let Some(ref content) = choice.delta.content
                                    && !content.is_empty()
                                {
                                    if tx.send(Ok(TokenChunk::text(content.clone()))).await.is_err()
                                    {
                                        return; // receiver dropped
                                    }
                                }
                            }
                            Err(e) => {
                                trace!(
                                    generator = %generator_name,
                                    data = %data,
                                    error = %e,
                                    "Ignoring unparseable SSE chunk"
                                );
                            }
                        }
                    }
                }
            }

            // Stream ended without [DONE]
            let _ = tx.send(Ok(TokenChunk::done())).await;
        });

        Ok(rx)
    }

    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status().is_success())
    }
}

/// Classify a transport-level request failure.
fn request_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout(e.to_string())
    } else {
        GenerationError::Network(e.to_string())
    }
}

/// Seconds to wait per the `Retry-After` header. Falls back to 5 when the
/// header is absent or uses the http-date form.
fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(5)
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_fields() {
        let generator = OpenAiCompatGenerator::new(
            "groq",
            "https://api.groq.com/openai/v1",
            "gsk-test",
            "llama-3.1-8b-instant",
        )
        .unwrap();
        assert_eq!(generator.name(), "groq");
        assert!(generator.base_url.contains("api.groq.com"));
        assert_eq!(generator.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn trims_trailing_slash() {
        let generator =
            OpenAiCompatGenerator::new("custom", "http://localhost:9999/v1/", "k", "m").unwrap();
        assert_eq!(generator.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn retry_after_header_parsed() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "12".parse().unwrap());
        assert_eq!(retry_after_secs(&headers), 12);
    }

    #[test]
    fn retry_after_falls_back_to_default() {
        let empty = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_secs(&empty), 5);

        // http-date form is not delta-seconds
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "Wed, 21 Oct 2026 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after_secs(&headers), 5);
    }

    // --- SSE parsing tests ---

    #[test]
    fn parse_stream_content_delta() {
        let data = r#"{"choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].delta.content.as_deref(), Some("Hello"));
        assert!(parsed.choices[0].finish_reason.is_none());
    }

    #[test]
    fn parse_stream_finish_chunk() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices[0].finish_reason.as_deref(), Some("stop"));
        assert!(parsed.choices[0].delta.content.is_none());
    }

    #[test]
    fn parse_empty_delta() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":null}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].delta.content.is_none());
    }

    #[test]
    fn parse_chunk_without_choices() {
        // Some backends send keep-alive frames with no choices array
        let data = r#"{"id":"chatcmpl-1","object":"chat.completion.chunk"}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
