//! Hybrid retrieval for kgraph.
//!
//! Combines a lexical (full-text) and a vector (semantic) candidate list into
//! a single ranking:
//! - [`fusion`]: per-list min-max normalization and weighted fusion
//! - [`adaptive`]: weight selection from candidate-list quality
//! - [`engine`]: the [`HybridSearchEngine`] orchestrating both adapters
//!
//! Reference in-memory adapters ([`InMemoryLexicalIndex`],
//! [`InMemoryVectorIndex`], [`HashingEmbedder`]) and a moka-backed
//! [`MokaResultCache`] let the engine run without external services.

pub mod adaptive;
pub mod cache;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod lexical;
pub mod vector;

pub use adaptive::{list_quality, select_weights, Favored, ListQuality, WeightSelection};
pub use cache::MokaResultCache;
pub use embedder::HashingEmbedder;
pub use engine::HybridSearchEngine;
pub use error::{Result, SearchError};
pub use fusion::{fuse, normalize, paginate, NormalizedScore};
pub use lexical::InMemoryLexicalIndex;
pub use vector::{cosine_similarity, InMemoryVectorIndex};

pub mod prelude {
    pub use crate::cache::MokaResultCache;
    pub use crate::embedder::HashingEmbedder;
    pub use crate::engine::HybridSearchEngine;
    pub use crate::error::{Result, SearchError};
    pub use crate::lexical::InMemoryLexicalIndex;
    pub use crate::vector::InMemoryVectorIndex;
}
