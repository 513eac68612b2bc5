//! Turn-level streaming events.
//!
//! `TurnEvent` is the pipeline's entire outward surface: a lazy sequence of
//! these, terminated either by stream exhaustion (success) or by a single
//! `Error` event. The gateway forwards them to clients over SSE unchanged.

use serde::{Deserialize, Serialize};

/// Events emitted while answering one question.
///
/// - `chunk` — partial answer text, relayed as the model produces it
/// - `error` — terminal failure; always the last event of its turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Partial answer text from the model.
    Chunk { content: String },

    /// The turn failed mid-generation. At most one per turn, always last.
    Error { message: String },
}

impl TurnEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::Error { .. } => "error",
        }
    }
}
