//! Chroma HTTP store implementation.
//!
//! Talks to a Chroma server over its REST API. Collection names are
//! resolved to ids once and cached, since ids are stable for the
//! lifetime of the server.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use standin_core::error::RetrievalError;
use standin_core::snippet::{Snippet, SnippetStore};

/// A snippet store backed by a remote Chroma server.
pub struct ChromaStore {
    base_url: String,
    client: reqwest::Client,
    collection_ids: RwLock<HashMap<String, String>>,
}

impl ChromaStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RetrievalError::NotConfigured(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            collection_ids: RwLock::new(HashMap::new()),
        })
    }

    /// Resolve a collection name to its server-side id, caching the result.
    async fn collection_id(&self, name: &str) -> Result<String, RetrievalError> {
        if let Some(id) = self.collection_ids.read().await.get(name) {
            return Ok(id.clone());
        }

        let url = format!("{}/api/v1/collections/{name}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(RetrievalError::CollectionNotFound(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(RetrievalError::QueryFailed {
                collection: name.to_string(),
                reason: format!("collection lookup returned {}", response.status()),
            });
        }

        let info: CollectionInfo =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::QueryFailed {
                    collection: name.to_string(),
                    reason: format!("unparseable collection info: {e}"),
                })?;

        debug!(collection = %name, id = %info.id, "Resolved Chroma collection");
        self.collection_ids
            .write()
            .await
            .insert(name.to_string(), info.id.clone());

        Ok(info.id)
    }
}

#[async_trait]
impl SnippetStore for ChromaStore {
    fn name(&self) -> &str {
        "chroma"
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, RetrievalError> {
        let id = self.collection_id(collection).await?;
        let url = format!("{}/api/v1/collections/{id}/query", self.base_url);

        let body = serde_json::json!({
            "query_texts": [query],
            "n_results": k,
            "include": ["documents", "distances"],
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            warn!(collection = %collection, %status, body = %error_body, "Chroma query failed");
            return Err(RetrievalError::QueryFailed {
                collection: collection.to_string(),
                reason: format!("query returned {status}"),
            });
        }

        let result: QueryResponse =
            response
                .json()
                .await
                .map_err(|e| RetrievalError::QueryFailed {
                    collection: collection.to_string(),
                    reason: format!("unparseable query response: {e}"),
                })?;

        // Results are nested per query text; we always send exactly one.
        let documents = result.documents.into_iter().next().unwrap_or_default();
        let distances = result
            .distances
            .unwrap_or_default()
            .into_iter()
            .next()
            .unwrap_or_default();

        Ok(documents
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let score = distances.get(i).map_or(0.0, |d| 1.0 - d);
                Snippet::new(text, collection, score)
            })
            .collect())
    }
}

// --- Chroma API types (internal) ---

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}
