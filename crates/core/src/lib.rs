//! # Standin Core
//!
//! Domain types, traits, and error definitions for the standin personal
//! assistant. This crate has **zero framework dependencies** — it defines the
//! boundaries that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two capabilities the answer pipeline consumes — similarity search over
//! topic collections and token-streaming text generation — are defined as
//! traits here. Implementations live in their respective crates, so the
//! pipeline can be exercised end to end with scripted fakes in tests.

pub mod error;
pub mod event;
pub mod generator;
pub mod snippet;

// Re-export key types at crate root for ergonomics
pub use error::{Error, GenerationError, Result, RetrievalError};
pub use event::TurnEvent;
pub use generator::{GenerationRequest, Generator, TokenChunk};
pub use snippet::{CollectionRef, Snippet, SnippetStore};
