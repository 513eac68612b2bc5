//! Collection store implementations for standin.
//!
//! All stores implement the `standin_core::SnippetStore` trait:
//! - `LocalVectorStore` — in-process cosine search over hash embeddings
//! - `ChromaStore` — HTTP adapter for a Chroma-style vector server
//!
//! Also home to the mojibake repair heuristic applied to retrieved text.

pub mod chroma;
pub mod embedding;
pub mod local;
pub mod mojibake;
pub mod similarity;

pub use chroma::ChromaStore;
pub use embedding::HashEmbedder;
pub use local::LocalVectorStore;
pub use mojibake::repair;
pub use similarity::cosine_similarity;
