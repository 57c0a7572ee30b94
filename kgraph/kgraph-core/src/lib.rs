//! Core types and abstractions for the kgraph knowledge graph engine.
//!
//! This crate provides the foundational data model, result DTOs, traits,
//! configuration and error handling shared by the traversal and hybrid
//! retrieval crates.
//!
//! Everything here is a read path over externally owned storage: the engine
//! never creates or deletes nodes, edges or embeddings, only the
//! request-scoped DTOs derived from them.

pub mod cache;
pub mod config;
pub mod deadline;
pub mod error;
pub mod id;
pub mod traits;
pub mod types;

pub use cache::{CacheKey, CachedResult};
pub use config::KgConfig;
pub use deadline::Deadline;
pub use error::{KgError, Result};
pub use id::{DocumentId, EdgeId, EmbeddingId, EntityId, NodeId};
pub use traits::*;
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{CacheKey, CachedResult};
    pub use crate::config::KgConfig;
    pub use crate::deadline::Deadline;
    pub use crate::error::{KgError, Result};
    pub use crate::id::{DocumentId, EdgeId, EmbeddingId, EntityId, NodeId};
    pub use crate::traits::*;
    pub use crate::types::*;
}
