//! In-memory cosine-similarity vector index.

use async_trait::async_trait;
use dashmap::DashMap;
use kgraph_core::{Embedding, EmbeddingId, EntityId, EntityKind, QueryEmbedder, Result, SearchCandidate, VectorSearchAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cosine similarity of two vectors; 0 when lengths differ or either is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Brute-force vector index over stored embeddings.
///
/// The query is embedded with the configured [`QueryEmbedder`]. Each hit is
/// reported for the node or document owning the embedding; an owner with
/// several matching embeddings keeps its best similarity.
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn QueryEmbedder>,
    embeddings: DashMap<EmbeddingId, Embedding>,
    default_threshold: f32,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn QueryEmbedder>, default_threshold: f32) -> Self {
        Self {
            embedder,
            embeddings: DashMap::new(),
            default_threshold,
        }
    }

    /// Add or replace an embedding.
    ///
    /// Embeddings without an owner or with the wrong dimension are ignored.
    pub fn insert(&self, embedding: Embedding) -> bool {
        if embedding.owner().is_none() {
            warn!("Ignoring embedding {} without an owner", embedding.id);
            return false;
        }
        if embedding.vector.len() != self.embedder.dimension() {
            warn!(
                "Ignoring embedding {}: dimension {} does not match {}",
                embedding.id,
                embedding.vector.len(),
                self.embedder.dimension()
            );
            return false;
        }
        self.embeddings.insert(embedding.id, embedding);
        true
    }

    pub fn remove(&self, id: &EmbeddingId) -> Option<Embedding> {
        self.embeddings.remove(id).map(|(_, embedding)| embedding)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    fn rank(&self, query: &[f32], threshold: f32, limit: usize) -> Vec<SearchCandidate> {
        let mut best: HashMap<EntityId, (EntityKind, f32)> = HashMap::new();
        for entry in self.embeddings.iter() {
            let Some((owner, kind)) = entry.owner() else {
                continue;
            };
            let similarity = cosine_similarity(query, &entry.vector);
            if similarity < threshold {
                continue;
            }
            best.entry(owner)
                .and_modify(|(_, score)| *score = score.max(similarity))
                .or_insert((kind, similarity));
        }

        let mut candidates: Vec<SearchCandidate> = best
            .into_iter()
            .map(|(id, (kind, score))| SearchCandidate::new(id, kind, score as f64))
            .collect();
        candidates.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score).then_with(|| a.entity_id.cmp(&b.entity_id)));
        candidates.truncate(limit);
        candidates
    }
}

#[async_trait]
impl VectorSearchAdapter for InMemoryVectorIndex {
    async fn search(&self, query: &str, threshold: Option<f32>, limit: usize) -> Result<Vec<SearchCandidate>> {
        let query_vector = self.embedder.embed(query).await?;
        let threshold = threshold.unwrap_or(self.default_threshold);
        let candidates = self.rank(&query_vector, threshold, limit);
        debug!(
            "Vector search for '{}' ({}) matched {} entities at threshold {}",
            query,
            self.embedder.model_name(),
            candidates.len(),
            threshold
        );
        Ok(candidates)
    }
}
