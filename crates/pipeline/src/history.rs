//! Rolling conversation history.
//!
//! Keeps a window of recent turns as labelled transcript lines
//! (`HUMAN: ...` / `AI: ...`). One turn contributes two lines, recorded
//! together after the answer has fully streamed. Failed or cancelled turns
//! are never recorded.

/// A bounded transcript of recent turns.
///
/// Eviction runs before append: when the line count already exceeds
/// `max_history`, the oldest turn (two lines) is dropped, then the new turn
/// is appended. The window therefore holds at most `max_history + 2` lines.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    lines: Vec<String>,
    max_history: usize,
}

impl ChatHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            lines: Vec::new(),
            max_history,
        }
    }

    /// Record one completed turn.
    pub fn record(&mut self, question: &str, answer: &str) {
        if self.lines.len() > self.max_history {
            self.lines.drain(..2);
        }
        self.lines.push(format!("HUMAN: {question}"));
        self.lines.push(format!("AI: {answer}"));
    }

    /// The transcript as newline-joined lines, oldest first. Empty string
    /// when no turns have been recorded.
    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
