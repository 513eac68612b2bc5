//! Local in-process vector store.
//!
//! Holds topic-partitioned documents in memory with hash embeddings and
//! ranks them by cosine similarity. Used for tests and for deployments
//! that ship their knowledge base as JSON files instead of running a
//! vector server.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use standin_core::error::RetrievalError;
use standin_core::snippet::{Snippet, SnippetStore};

use crate::embedding::HashEmbedder;
use crate::similarity::cosine_similarity;

struct Document {
    text: String,
    embedding: Vec<f32>,
}

/// An in-process store of named collections, searchable by cosine similarity.
pub struct LocalVectorStore {
    embedder: HashEmbedder,
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl LocalVectorStore {
    pub fn new() -> Self {
        Self {
            embedder: HashEmbedder::default(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Add documents to a collection, creating it if needed.
    pub async fn add_documents(&self, collection: &str, texts: Vec<String>) {
        let docs: Vec<Document> = texts
            .into_iter()
            .map(|text| {
                let embedding = self.embedder.embed(&text);
                Document { text, embedding }
            })
            .collect();

        let mut collections = self.collections.write().await;
        let entry = collections.entry(collection.to_string()).or_default();
        let added = docs.len();
        entry.extend(docs);
        debug!(collection = %collection, added, total = entry.len(), "Documents added");
    }

    /// Number of documents in a collection (0 if it does not exist).
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    /// Load collections from a directory of `<name>.json` files, each a JSON
    /// array of document strings.
    pub async fn load_from_dir(path: &Path) -> Result<Self, RetrievalError> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct DocumentFile(Vec<String>);

        let store = Self::new();

        let entries = std::fs::read_dir(path).map_err(|e| {
            RetrievalError::NotConfigured(format!("cannot read data dir {}: {e}", path.display()))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| RetrievalError::NotConfigured(e.to_string()))?;
            let file_path = entry.path();
            if file_path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = file_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&file_path).map_err(|e| {
                RetrievalError::NotConfigured(format!("{}: {e}", file_path.display()))
            })?;
            let docs: DocumentFile = serde_json::from_str(&content).map_err(|e| {
                RetrievalError::NotConfigured(format!("{}: {e}", file_path.display()))
            })?;

            info!(collection = %name, documents = docs.0.len(), "Loaded collection");
            store.add_documents(name, docs.0).await;
        }

        Ok(store)
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnippetStore for LocalVectorStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, RetrievalError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .ok_or_else(|| RetrievalError::CollectionNotFound(collection.to_string()))?;

        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<(f32, &Document)> = docs
            .iter()
            .map(|doc| (cosine_similarity(&doc.embedding, &query_embedding), doc))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, doc)| Snippet::new(&doc.text, collection, score))
            .collect())
    }
}
