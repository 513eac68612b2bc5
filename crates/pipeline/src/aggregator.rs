//! Retrieval aggregation: fan out one question across every collection and
//! fold the hits into a single evidence block.
//!
//! A failing collection is demoted to "zero snippets" with a warning — one
//! flaky topic never takes down the turn. Output order always follows the
//! configured collection list, not completion order.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use standin_core::snippet::{CollectionRef, Snippet, SnippetStore};
use standin_retrieval::repair;

/// Gathers evidence snippets for a question across an ordered collection list.
pub struct ContextAggregator {
    store: Arc<dyn SnippetStore>,
    collections: Vec<CollectionRef>,
    parallel: bool,
}

impl ContextAggregator {
    pub fn new(store: Arc<dyn SnippetStore>, collections: Vec<CollectionRef>, parallel: bool) -> Self {
        Self {
            store,
            collections,
            parallel,
        }
    }

    pub fn collections(&self) -> &[CollectionRef] {
        &self.collections
    }

    /// Query every collection and join the snippet texts with blank lines.
    ///
    /// Returns an empty string when nothing was retrieved anywhere.
    pub async fn gather(&self, question: &str) -> String {
        let results = if self.parallel && self.store.supports_concurrent_search() {
            self.gather_parallel(question).await
        } else {
            self.gather_sequential(question).await
        };

        let mut texts: Vec<String> = Vec::new();
        for (collection, result) in self.collections.iter().zip(results) {
            match result {
                Ok(snippets) => {
                    debug!(collection = %collection.name, hits = snippets.len(), "Collection queried");
                    texts.extend(snippets.into_iter().map(|s| repair(&s.text)));
                }
                Err(e) => {
                    warn!(collection = %collection.name, error = %e, "Collection query failed, skipping");
                }
            }
        }

        texts.join("\n\n")
    }

    async fn gather_parallel(
        &self,
        question: &str,
    ) -> Vec<Result<Vec<Snippet>, standin_core::RetrievalError>> {
        // join_all output order matches the collection list, whatever order
        // the individual queries complete in.
        join_all(self.collections.iter().map(|c| {
            let store = Arc::clone(&self.store);
            async move { store.search(&c.name, question, c.result_cap).await }
        }))
        .await
    }

    async fn gather_sequential(
        &self,
        question: &str,
    ) -> Vec<Result<Vec<Snippet>, standin_core::RetrievalError>> {
        let mut results = Vec::with_capacity(self.collections.len());
        for c in &self.collections {
            results.push(self.store.search(&c.name, question, c.result_cap).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use standin_core::RetrievalError;
    use std::time::Duration;

    /// A store whose collections answer with fixed snippets after a
    /// per-collection delay, or fail outright.
    struct ScriptedStore {
        responses: Vec<(String, Duration, Result<Vec<String>, RetrievalError>)>,
        concurrent: bool,
    }

    #[async_trait]
    impl SnippetStore for ScriptedStore {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(
            &self,
            collection: &str,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<Snippet>, RetrievalError> {
            let (_, delay, result) = self
                .responses
                .iter()
                .find(|(name, _, _)| name == collection)
                .ok_or_else(|| RetrievalError::CollectionNotFound(collection.to_string()))?;

            tokio::time::sleep(*delay).await;
            result.clone().map(|texts| {
                texts
                    .into_iter()
                    .map(|t| Snippet::new(t, collection, 0.9))
                    .collect()
            })
        }

        fn supports_concurrent_search(&self) -> bool {
            self.concurrent
        }
    }

    fn refs(names: &[&str]) -> Vec<CollectionRef> {
        names.iter().map(|n| CollectionRef::new(*n, 3)).collect()
    }

    #[tokio::test]
    async fn gathers_in_collection_order_despite_latency() {
        // "slow" finishes last but is listed first.
        let store = Arc::new(ScriptedStore {
            responses: vec![
                (
                    "slow".into(),
                    Duration::from_millis(50),
                    Ok(vec!["first evidence".into()]),
                ),
                (
                    "fast".into(),
                    Duration::from_millis(1),
                    Ok(vec!["second evidence".into()]),
                ),
            ],
            concurrent: true,
        });

        let agg = ContextAggregator::new(store, refs(&["slow", "fast"]), true);
        let context = agg.gather("anything").await;
        assert_eq!(context, "first evidence\n\nsecond evidence");
    }

    #[tokio::test]
    async fn failing_collection_is_skipped() {
        let store = Arc::new(ScriptedStore {
            responses: vec![
                (
                    "personal".into(),
                    Duration::ZERO,
                    Ok(vec!["Lives in Dhaka".into()]),
                ),
                (
                    "broken".into(),
                    Duration::ZERO,
                    Err(RetrievalError::Network("connection refused".into())),
                ),
                (
                    "projects".into(),
                    Duration::ZERO,
                    Ok(vec!["Built a chatbot".into()]),
                ),
            ],
            concurrent: true,
        });

        let agg = ContextAggregator::new(store, refs(&["personal", "broken", "projects"]), true);
        let context = agg.gather("anything").await;
        assert_eq!(context, "Lives in Dhaka\n\nBuilt a chatbot");
    }

    #[tokio::test]
    async fn all_empty_yields_empty_string() {
        let store = Arc::new(ScriptedStore {
            responses: vec![("personal".into(), Duration::ZERO, Ok(vec![]))],
            concurrent: true,
        });

        let agg = ContextAggregator::new(store, refs(&["personal"]), true);
        assert_eq!(agg.gather("anything").await, "");
    }

    #[tokio::test]
    async fn non_concurrent_store_is_queried_sequentially() {
        let store = Arc::new(ScriptedStore {
            responses: vec![
                ("a".into(), Duration::ZERO, Ok(vec!["one".into()])),
                ("b".into(), Duration::ZERO, Ok(vec!["two".into()])),
            ],
            concurrent: false,
        });

        // parallel=true is requested but the store refuses it.
        let agg = ContextAggregator::new(store, refs(&["a", "b"]), true);
        assert_eq!(agg.gather("anything").await, "one\n\ntwo");
    }

    #[tokio::test]
    async fn snippet_text_is_repaired() {
        let store = Arc::new(ScriptedStore {
            responses: vec![(
                "personal".into(),
                Duration::ZERO,
                Ok(vec!["Itâ€™s fine".into()]),
            )],
            concurrent: true,
        });

        let agg = ContextAggregator::new(store, refs(&["personal"]), true);
        assert_eq!(agg.gather("anything").await, "It’s fine");
    }
}
