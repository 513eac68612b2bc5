//! The similarity-search boundary — named collections of text evidence.
//!
//! A `SnippetStore` is the one capability the retrieval side of the pipeline
//! consumes: "given a query and a result count, return ranked snippets from
//! one named collection." Whatever index technology sits underneath (local
//! cosine search, a Chroma server) is hidden behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RetrievalError;

/// A retrieved unit of text evidence from one collection.
///
/// Ephemeral: produced per query, discarded once the evidence block for the
/// turn has been assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    /// The snippet text.
    pub text: String,

    /// Which collection it came from.
    pub collection: String,

    /// Similarity score assigned by the store (higher = closer).
    #[serde(default)]
    pub score: f32,
}

impl Snippet {
    pub fn new(text: impl Into<String>, collection: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            collection: collection.into(),
            score,
        }
    }
}

/// A named collection and its per-query result cap.
///
/// The pipeline holds a fixed, ordered list of these; the list is immutable
/// after construction and safely shared across turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Collection name (e.g. "personal", "academic").
    pub name: String,

    /// Maximum snippets to request from this collection per query.
    pub result_cap: usize,
}

impl CollectionRef {
    pub fn new(name: impl Into<String>, result_cap: usize) -> Self {
        Self {
            name: name.into(),
            result_cap,
        }
    }
}

/// The similarity-search capability over topic-partitioned collections.
///
/// Implementations: local cosine store, Chroma HTTP store, scripted fakes.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// The store name (e.g. "local", "chroma").
    fn name(&self) -> &str;

    /// Return up to `k` ranked snippets from `collection` for `query`.
    ///
    /// May fail per call; callers decide whether a failure aborts anything
    /// (the aggregator treats it as "zero snippets from this collection").
    async fn search(
        &self,
        collection: &str,
        query: &str,
        k: usize,
    ) -> std::result::Result<Vec<Snippet>, RetrievalError>;

    /// Whether concurrent searches from one process are safe.
    ///
    /// Stores backed by single-reader technology return `false`, and the
    /// aggregator queries them strictly sequentially.
    fn supports_concurrent_search(&self) -> bool {
        true
    }
}
