//! Deterministic feature-hashing embedder.

use crate::lexical::tokenize;
use async_trait::async_trait;
use kgraph_core::{KgError, QueryEmbedder, Result};

/// Embeds text by hashing each word into a signed bucket and L2-normalizing.
///
/// Texts sharing words get similar vectors, which is enough to exercise
/// vector retrieval without a model. The same text always yields the same
/// vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const MODEL_NAME: &'static str = "hashing-v1";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];
        for word in tokenize(text) {
            let hash = word.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        embedding
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(128)
    }
}

#[async_trait]
impl QueryEmbedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(KgError::invalid_input("cannot embed blank text"));
        }
        Ok(self.embed_text(text))
    }

    fn model_name(&self) -> &str {
        Self::MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine_similarity;

    #[tokio::test]
    async fn test_embedding_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed("knowledge graph").await.unwrap();
        let b = embedder.embed("knowledge graph").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_words_raise_similarity() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("hybrid graph retrieval").await.unwrap();
        let close = embedder.embed("graph retrieval engine").await.unwrap();
        let same = embedder.embed("Hybrid GRAPH retrieval").await.unwrap();

        assert!((cosine_similarity(&query, &same) - 1.0).abs() < 1e-5);
        assert!(cosine_similarity(&query, &close) > 0.3);
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let err = HashingEmbedder::default().embed("  ").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
