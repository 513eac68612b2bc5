//! Error types for the standin domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all standin operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from a single collection search.
///
/// These are recovered locally by the aggregator: a failing collection
/// contributes zero snippets and never aborts a turn.
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Query failed on '{collection}': {reason}")]
    QueryFailed { collection: String, reason: String },

    #[error("Store not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures from the token-streaming generation capability.
///
/// These are the only errors a client ever sees, surfaced as one terminal
/// error event per turn.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
