//! Hybrid search orchestration.

use crate::adaptive::select_weights;
use crate::error::{Result, SearchError};
use crate::fusion::{fuse, paginate};
use kgraph_core::cache::normalize_query;
use kgraph_core::config::SearchConfig;
use kgraph_core::{FusionWeights, LexicalSearchAdapter, PageRequest, SearchCandidate, SearchPage, SearchType, VectorSearchAdapter};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Fuses lexical and vector retrieval into one paginated ranking.
///
/// Both adapters are queried concurrently. The engine keeps no state between
/// queries, so a failure in one query never affects the next.
pub struct HybridSearchEngine {
    lexical: Arc<dyn LexicalSearchAdapter>,
    vector: Arc<dyn VectorSearchAdapter>,
    config: SearchConfig,
}

impl HybridSearchEngine {
    pub fn new(lexical: Arc<dyn LexicalSearchAdapter>, vector: Arc<dyn VectorSearchAdapter>, config: SearchConfig) -> Self {
        Self {
            lexical,
            vector,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search with caller weights, falling back to the configured defaults.
    ///
    /// When only one weight is given and it lies in `[0, 1]`, the other is
    /// its complement. Weights are normalized to sum to 1.
    #[instrument(skip(self), fields(page = page.page, size = page.size))]
    pub async fn hybrid_search(
        &self,
        query: &str,
        lexical_weight: Option<f64>,
        vector_weight: Option<f64>,
        page: PageRequest,
    ) -> Result<SearchPage> {
        let start = Instant::now();
        let query = validate_query(query)?;
        let weights = self.resolve_weights(lexical_weight, vector_weight)?;
        let (lexical, vector) = self.gather(&query, page).await?;

        let result = paginate(fuse(&lexical, &vector, weights), page, &query, SearchType::Hybrid, weights)?;
        info!(
            "Hybrid search returned {} of {} results in {:?}",
            result.results.len(),
            result.total_elements,
            start.elapsed()
        );
        Ok(result)
    }

    /// Search with weights chosen from the quality of the two candidate lists.
    #[instrument(skip(self), fields(page = page.page, size = page.size))]
    pub async fn adaptive_hybrid_search(&self, query: &str, page: PageRequest) -> Result<SearchPage> {
        let start = Instant::now();
        let query = validate_query(query)?;
        let (lexical, vector) = self.gather(&query, page).await?;

        let selection = select_weights(&lexical, &vector, &self.config.adaptive);
        debug!(
            "Adaptive weights {:?} (lexical quality {:.3}, vector quality {:.3})",
            selection.favored, selection.lexical_quality.score, selection.vector_quality.score
        );

        let weights = selection.weights;
        let result = paginate(
            fuse(&lexical, &vector, weights),
            page,
            &query,
            SearchType::AdaptiveHybrid,
            weights,
        )?;
        info!(
            "Adaptive hybrid search returned {} of {} results in {:?}",
            result.results.len(),
            result.total_elements,
            start.elapsed()
        );
        Ok(result)
    }

    pub fn resolve_weights(&self, lexical: Option<f64>, vector: Option<f64>) -> Result<FusionWeights> {
        let (lexical, vector) = match (lexical, vector) {
            (Some(l), Some(v)) => (l, v),
            (Some(l), None) if (0.0..=1.0).contains(&l) => (l, 1.0 - l),
            (None, Some(v)) if (0.0..=1.0).contains(&v) => (1.0 - v, v),
            (l, v) => (
                l.unwrap_or(self.config.default_lexical_weight),
                v.unwrap_or(self.config.default_vector_weight),
            ),
        };
        FusionWeights::new(lexical, vector).map_err(|e| SearchError::InvalidWeights(e.to_string()))
    }

    /// Query both adapters for the full candidate lists.
    ///
    /// The vector limit does not depend on the requested page, so every page
    /// of a query slices the same fused ranking.
    async fn gather(&self, query: &str, page: PageRequest) -> Result<(Vec<SearchCandidate>, Vec<SearchCandidate>)> {
        if page.size == 0 {
            return Err(SearchError::InvalidPage("page size must be positive".to_string()));
        }
        let vector_limit = self.config.max_vector_candidates.max(1);

        let (lexical, vector) = tokio::join!(
            self.lexical.search(query),
            self.vector.search(query, Some(self.config.vector_threshold), vector_limit)
        );
        let lexical = lexical.map_err(SearchError::lexical)?;
        let vector = vector.map_err(SearchError::vector)?;

        debug!(
            "Gathered {} lexical and {} vector candidates (vector limit {})",
            lexical.len(),
            vector.len(),
            vector_limit
        );
        Ok((lexical, vector))
    }
}

/// Normalize whitespace so the echoed query matches the cache key.
fn validate_query(query: &str) -> Result<String> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return Err(SearchError::InvalidQuery("query must not be blank".to_string()));
    }
    Ok(normalized)
}
