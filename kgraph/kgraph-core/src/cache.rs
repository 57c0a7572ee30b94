//! Cache keys and cacheable values.

use crate::id::NodeId;
use crate::types::{ComponentResult, FusionWeights, GraphNeighborhood, GraphStats, PathResult, SearchPage};

/// Normalized query parameters identifying a cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Neighborhood {
        node: NodeId,
        hops: usize,
        centrality: bool,
    },
    Path {
        from: NodeId,
        to: NodeId,
        max_hops: usize,
    },
    Component {
        node: NodeId,
    },
    Stats,
    Search {
        query: String,
        // Stored as strings for hashing; None for adaptive weighting
        weights: Option<(String, String)>,
        page: usize,
        size: usize,
    },
}

impl CacheKey {
    pub fn search(query: &str, weights: Option<FusionWeights>, page: usize, size: usize) -> Self {
        Self::Search {
            query: normalize_query(query),
            weights: weights.map(|w| (format!("{:.6}", w.lexical), format!("{:.6}", w.vector))),
            page,
            size,
        }
    }

    /// Cache namespace, used in logs
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Neighborhood { .. } => "neighborhoods",
            Self::Path { .. } => "paths",
            Self::Component { .. } => "components",
            Self::Stats => "graph_stats",
            Self::Search { .. } => "search_results",
        }
    }
}

/// Collapse whitespace runs and trim, so equivalent queries share a key.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A cached query result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedResult {
    Neighborhood(GraphNeighborhood),
    Path(PathResult),
    Component(ComponentResult),
    Stats(GraphStats),
    Search(SearchPage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_normalizes_whitespace() {
        let a = CacheKey::search("  graph   databases ", None, 0, 10);
        let b = CacheKey::search("graph databases", None, 0, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_search_key_distinguishes_weights() {
        let a = CacheKey::search("q", Some(FusionWeights::balanced()), 0, 10);
        let b = CacheKey::search("q", Some(FusionWeights::lexical_only()), 0, 10);
        let c = CacheKey::search("q", None, 0, 10);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.namespace(), "search_results");
    }
}
