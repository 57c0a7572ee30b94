//! JSON graph snapshots.
//!
//! A snapshot is the read-only dataset the CLI serves queries from:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "…", "type": "person", "name": "Ada Lovelace" }],
//!   "edges": [{ "id": "…", "source_id": "…", "target_id": "…", "type": "affiliated_with" }],
//!   "documents": [{ "id": "…", "title": "Notes", "content": "…" }],
//!   "embeddings": [{ "id": "…", "node_id": "…", "vector": [0.1, 0.2] }]
//! }
//! ```

use kgraph_core::{DocumentId, Edge, Embedding, KgError, Node, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A source document retrievable by hybrid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl SourceDocument {
    pub fn text(&self) -> String {
        if self.content.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.content)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub documents: Vec<SourceDocument>,
    #[serde(default)]
    pub embeddings: Vec<Embedding>,
}

impl GraphSnapshot {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        info!(
            "Loaded snapshot {}: {} nodes, {} edges, {} documents, {} embeddings",
            path.display(),
            snapshot.nodes.len(),
            snapshot.edges.len(),
            snapshot.documents.len(),
            snapshot.embeddings.len()
        );
        Ok(snapshot)
    }

    /// Dimension shared by the stored embeddings, if any.
    ///
    /// Mixed dimensions are rejected since a single query vector cannot be
    /// compared against all of them.
    pub fn embedding_dimension(&self) -> Result<Option<usize>> {
        let mut dimensions = self.embeddings.iter().map(|e| e.vector.len());
        let Some(first) = dimensions.next() else {
            return Ok(None);
        };
        if dimensions.any(|d| d != first) {
            return Err(KgError::invalid_input("snapshot embeddings have mixed dimensions"));
        }
        Ok(Some(first))
    }
}
