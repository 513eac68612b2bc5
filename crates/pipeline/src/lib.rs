//! # Standin Pipeline
//!
//! The answer pipeline: rolling chat history, multi-collection retrieval
//! aggregation, prompt assembly, keyword shortcuts, and the turn orchestrator
//! that streams answer events to the caller.
//!
//! The pipeline is backend-agnostic — it consumes the `SnippetStore` and
//! `Generator` traits from `standin-core` and never sees wire formats.

pub mod aggregator;
pub mod history;
pub mod prompt;
pub mod shortcuts;
pub mod turn;

pub use aggregator::ContextAggregator;
pub use history::ChatHistory;
pub use prompt::{DEFAULT_TEMPLATE, PromptTemplate, TemplateError};
pub use shortcuts::{Shortcut, ShortcutTable};
pub use turn::TurnPipeline;
