//! Prompt assembly from a placeholder template.
//!
//! A template carries three placeholders — `{chat_history}`, `{context}`,
//! `{question}` — and rendering is plain substitution. Validation happens
//! once at construction so a bad template fails at startup, not mid-turn.

use thiserror::Error;

/// The three placeholders every template must contain.
pub const REQUIRED_PLACEHOLDERS: [&str; 3] = ["{chat_history}", "{context}", "{question}"];

/// Default template: answer in first person from the retrieved evidence,
/// stay consistent with the conversation so far.
pub const DEFAULT_TEMPLATE: &str = "\
You are answering as the person described in the background information below. \
Speak in the first person, stay factual, and keep answers short and conversational. \
If the background does not cover the question, say you are not sure instead of inventing details.

Conversation so far:
{chat_history}

Background information:
{context}

Question: {question}
Answer:";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template missing required placeholder: {0}")]
    MissingPlaceholder(&'static str),
}

/// A validated prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Validate and wrap a template string.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        for placeholder in REQUIRED_PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(TemplateError::MissingPlaceholder(placeholder));
            }
        }
        Ok(Self { template })
    }

    /// Substitute all three placeholders. Empty sections substitute as
    /// empty strings; the surrounding template text is kept as-is.
    pub fn render(&self, chat_history: &str, context: &str, question: &str) -> String {
        self.template
            .replace("{chat_history}", chat_history)
            .replace("{context}", context)
            .replace("{question}", question)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
