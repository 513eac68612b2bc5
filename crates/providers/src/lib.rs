//! # Standin Providers
//!
//! Generation backends implementing the `standin_core::Generator` trait.
//!
//! One implementation covers nearly everything: `OpenAiCompatGenerator`
//! speaks the OpenAI chat-completions wire format that Groq, OpenAI,
//! OpenRouter, Ollama, and vLLM all expose.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatGenerator;
