//! Deterministic feature-hash embeddings.
//!
//! No model download, no network: each lowercase word is hashed into one of
//! `dimension` buckets with a hash-derived sign, and the resulting vector is
//! L2-normalized. Word overlap between texts then shows up as cosine
//! similarity. Crude next to a sentence-transformer, but deterministic and
//! dependency-free, which is what the local store wants for tests and small
//! deployments.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Embeds text into a fixed-size vector via signed feature hashing.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed one text. Returns an all-zero vector for text with no word
    /// characters; callers rank such vectors at similarity 0.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let h = hasher.finish();

            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| (x * x) as f64).sum::<f64>().sqrt();
        if norm > 1e-10 {
            for x in &mut vector {
                *x = (*x as f64 / norm) as f32;
            }
        }

        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        // Matches the 768-dim vectors the original collections were built with.
        Self::new(768)
    }
}

/// Lowercased alphanumeric word split. Unicode-aware so non-Latin scripts
/// hash as words rather than being dropped.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn deterministic() {
        let embedder = HashEmbedder::new(128);
        let a = embedder.embed("Samim studied computer science");
        let b = embedder.embed("Samim studied computer science");
        assert_eq!(a, b);
    }

    #[test]
    fn dimension_respected() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed("hello world").len(), 64);
    }

    #[test]
    fn identical_text_is_most_similar() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("robotics and embedded systems");
        let same = embedder.embed("robotics and embedded systems");
        let other = embedder.embed("favourite food is biryani");
        assert!(cosine_similarity(&query, &same) > cosine_similarity(&query, &other));
    }

    #[test]
    fn overlapping_text_scores_above_disjoint() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("where did he study computer science");
        let overlap = embedder.embed("he went to study computer science in Dhaka");
        let disjoint = embedder.embed("plays guitar on weekends");
        assert!(cosine_similarity(&query, &overlap) > cosine_similarity(&query, &disjoint));
    }

    #[test]
    fn empty_text_embeds_to_zero() {
        let embedder = HashEmbedder::new(32);
        let v = embedder.embed("   ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn case_insensitive() {
        let embedder = HashEmbedder::new(256);
        assert_eq!(embedder.embed("Hello World"), embedder.embed("hello world"));
    }
}
