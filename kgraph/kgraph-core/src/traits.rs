//! Interfaces of the external collaborators the engine consumes.
//!
//! Storage, the lexical index, the vector index, embedding generation and
//! the result cache all live outside the engine; these traits are the seams.

use crate::cache::{CacheKey, CachedResult};
use crate::error::Result;
use crate::id::NodeId;
use crate::types::{Edge, Node, SearchCandidate};
use async_trait::async_trait;
use std::time::Duration;

/// An incident edge of a node together with the node on its far end.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    pub edge: Edge,
    pub other: Node,
}

/// Read access to the property graph.
#[async_trait]
pub trait GraphAccessor: Send + Sync {
    /// Get a node by ID
    async fn node(&self, id: &NodeId) -> Result<Option<Node>>;

    /// Incident edges of `id` in both directions with their far-end nodes.
    ///
    /// Fails with `NotFound` only when `id` itself does not exist. An edge
    /// whose far end is missing is dropped from the result, not raised.
    async fn neighbors(&self, id: &NodeId) -> Result<Vec<Adjacency>>;
}

/// Whole-graph enumeration, used for statistics.
#[async_trait]
pub trait GraphScan: GraphAccessor {
    /// All nodes
    async fn nodes(&self) -> Result<Vec<Node>>;

    /// All edges, including dangling ones
    async fn edges(&self) -> Result<Vec<Edge>>;
}

/// Full-text search producing ranked candidates with raw scores.
#[async_trait]
pub trait LexicalSearchAdapter: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>>;
}

/// Vector-similarity search producing ranked candidates with raw scores.
#[async_trait]
pub trait VectorSearchAdapter: Send + Sync {
    /// Candidates scoring at least `threshold` (adapter default when `None`),
    /// at most `limit` of them.
    async fn search(
        &self,
        query: &str,
        threshold: Option<f32>,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>>;
}

/// Embedding generation for query text.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Generate an embedding for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;
}

/// Best-effort memoization of query results.
///
/// Implementations must tolerate concurrent reads and inserts. A missing or
/// failing cache changes latency only, never results.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<CachedResult>;

    async fn put(&self, key: CacheKey, value: CachedResult, ttl: Duration);
}
