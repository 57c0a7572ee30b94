//! Retrieval types shared by the search adapters and the fusion engine.

use crate::error::{KgError, Result};
use crate::id::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of retrievable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Node,
    Document,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Document => f.write_str("document"),
        }
    }
}

/// One ranked hit from a lexical or vector adapter, with its raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub entity_id: EntityId,
    pub entity_kind: EntityKind,
    pub raw_score: f64,
}

impl SearchCandidate {
    pub fn new(entity_id: impl Into<EntityId>, entity_kind: EntityKind, raw_score: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_kind,
            raw_score,
        }
    }

    pub fn node(entity_id: impl Into<EntityId>, raw_score: f64) -> Self {
        Self::new(entity_id, EntityKind::Node, raw_score)
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    pub fn first(size: usize) -> Self {
        Self::new(0, size)
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// How a result page was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Hybrid,
    AdaptiveHybrid,
}

/// Lexical/vector fusion weights, normalized to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub lexical: f64,
    pub vector: f64,
}

impl FusionWeights {
    /// Validate and normalize a weight pair.
    ///
    /// Weights must be finite and non-negative, and must not both be zero.
    pub fn new(lexical: f64, vector: f64) -> Result<Self> {
        if !lexical.is_finite() || !vector.is_finite() {
            return Err(KgError::invalid_input("fusion weights must be finite"));
        }
        if lexical < 0.0 || vector < 0.0 {
            return Err(KgError::invalid_input("fusion weights must be non-negative"));
        }
        let total = lexical + vector;
        if total <= 0.0 {
            return Err(KgError::invalid_input("fusion weights must not both be zero"));
        }

        Ok(Self {
            lexical: lexical / total,
            vector: vector / total,
        })
    }

    pub const fn balanced() -> Self {
        Self {
            lexical: 0.5,
            vector: 0.5,
        }
    }

    pub const fn lexical_only() -> Self {
        Self {
            lexical: 1.0,
            vector: 0.0,
        }
    }

    pub const fn vector_only() -> Self {
        Self {
            lexical: 0.0,
            vector: 1.0,
        }
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self::balanced()
    }
}

/// One entry of a fused ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entity_id: EntityId,
    pub entity_kind: EntityKind,
    /// 1-based position in the full fused ranking
    pub rank: usize,
    pub score: f64,
    /// Normalized lexical contribution before weighting (0 when absent)
    pub lexical_score: f64,
    /// Normalized vector contribution before weighting (0 when absent)
    pub vector_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_lexical_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_vector_score: Option<f64>,
}

/// A page of fused results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<RankedResult>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub query: String,
    pub search_type: SearchType,
    pub weights: FusionWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    pub type_facets: BTreeMap<EntityKind, usize>,
}
