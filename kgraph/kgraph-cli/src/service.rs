//! Knowledge graph service: the API boundary over traversal and search.
//!
//! The service owns precondition checks (hop range, node-set sizes, page
//! sizes, blank queries), memoizes results through an optional
//! [`ResultCache`], and bounds traversals with the configured deadline.
//! Nothing below this layer validates caller input.

use crate::snapshot::GraphSnapshot;
use kgraph_core::{
    CacheKey, CachedResult, ComponentResult, Embedding, EmbeddingId, EntityId, EntityKind, GraphNeighborhood, GraphScan, GraphStats,
    KgConfig, KgError, LexicalSearchAdapter, NodeId, PageRequest, PathResult, QueryEmbedder, Result, ResultCache,
    SearchPage, VectorSearchAdapter,
};
use kgraph_search::lexical::node_text;
use kgraph_search::{HashingEmbedder, HybridSearchEngine, InMemoryLexicalIndex, InMemoryVectorIndex, MokaResultCache};
use kgraph_traversal::{GraphTraversal, InMemoryGraph};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_EMBEDDING_DIMENSION: usize = 128;

pub struct KnowledgeGraphService {
    traversal: GraphTraversal<dyn GraphScan>,
    search: HybridSearchEngine,
    cache: Option<Arc<dyn ResultCache>>,
    config: KgConfig,
}

impl KnowledgeGraphService {
    pub fn new(
        graph: Arc<dyn GraphScan>,
        lexical: Arc<dyn LexicalSearchAdapter>,
        vector: Arc<dyn VectorSearchAdapter>,
        config: KgConfig,
    ) -> Self {
        let traversal =
            GraphTraversal::new(graph).with_timeout(Duration::from_millis(config.traversal.query_timeout_ms));
        let search = HybridSearchEngine::new(lexical, vector, config.search.clone());
        Self {
            traversal,
            search,
            cache: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Serve a snapshot from memory with the reference adapters.
    ///
    /// Nodes and documents are indexed for lexical search. Any node or
    /// document without a stored embedding gets one from the hashing
    /// embedder, so vector search covers the whole snapshot.
    pub fn from_snapshot(snapshot: GraphSnapshot, config: KgConfig) -> Result<Self> {
        let dimension = snapshot.embedding_dimension()?.unwrap_or(DEFAULT_EMBEDDING_DIMENSION);
        let embedder = HashingEmbedder::new(dimension);

        let lexical = InMemoryLexicalIndex::new();
        let vector = InMemoryVectorIndex::new(Arc::new(embedder.clone()), config.search.vector_threshold);

        let embedded: HashSet<EntityId> = snapshot.embeddings.iter().filter_map(Embedding::owner).map(|(id, _)| id).collect();
        for node in &snapshot.nodes {
            lexical.index_node(node);
            if !embedded.contains(&EntityId::from(node.id)) {
                vector.insert(Embedding::for_node(EmbeddingId::new(), node.id, embedder.embed_text(&node_text(node))));
            }
        }
        for document in &snapshot.documents {
            lexical.index_text(document.id, EntityKind::Document, &document.text());
            if !embedded.contains(&EntityId::from(document.id)) {
                vector.insert(Embedding::for_document(
                    EmbeddingId::new(),
                    document.id,
                    embedder.embed_text(&document.text()),
                ));
            }
        }
        for embedding in snapshot.embeddings {
            vector.insert(embedding);
        }

        let graph = InMemoryGraph::from_parts(snapshot.nodes, snapshot.edges);
        info!(
            "Serving {} nodes, {} lexical entries, {} embeddings ({} via {})",
            graph.node_count(),
            lexical.len(),
            vector.len(),
            dimension,
            embedder.model_name()
        );

        let cache_enabled = config.cache.enabled;
        let max_capacity = config.cache.max_capacity;
        let service = Self::new(Arc::new(graph), Arc::new(lexical), Arc::new(vector), config);
        Ok(if cache_enabled {
            service.with_cache(Arc::new(MokaResultCache::new(max_capacity)))
        } else {
            service
        })
    }

    pub fn config(&self) -> &KgConfig {
        &self.config
    }

    /// Resolve a node reference given either as a UUID or as an exact name
    /// (case-insensitive).
    pub async fn resolve_node(&self, reference: &str) -> Result<NodeId> {
        if let Ok(id) = NodeId::parse(reference) {
            return Ok(id);
        }

        let mut matches = self
            .traversal
            .graph()
            .nodes()
            .await?
            .into_iter()
            .filter(|n| n.name.eq_ignore_ascii_case(reference));
        match (matches.next(), matches.next()) {
            (Some(node), None) => Ok(node.id),
            (Some(_), Some(_)) => Err(KgError::invalid_input(format!(
                "node name '{}' is ambiguous, use its id",
                reference
            ))),
            (None, _) => Err(KgError::not_found("node", reference)),
        }
    }

    pub async fn get_neighborhood(
        &self,
        node_id: NodeId,
        hops: Option<usize>,
        include_centrality: bool,
    ) -> Result<GraphNeighborhood> {
        let hops = hops.unwrap_or(self.config.traversal.default_hops);
        let (min, max) = (self.config.traversal.min_hops, self.config.traversal.max_hops);
        if !(min..=max).contains(&hops) {
            return Err(KgError::invalid_input(format!("hops must lie in {}..={}, got {}", min, max, hops)));
        }

        let key = CacheKey::Neighborhood {
            node: node_id,
            hops,
            centrality: include_centrality,
        };
        let compute = async {
            if include_centrality {
                self.traversal.get_neighborhood_with_centrality(node_id, hops).await
            } else {
                self.traversal.get_neighborhood(node_id, hops).await
            }
        };
        self.cached(
            key,
            |hit| match hit {
                CachedResult::Neighborhood(n) => Some(n),
                _ => None,
            },
            CachedResult::Neighborhood,
            compute,
        )
        .await
    }

    pub async fn find_shortest_path(&self, from: NodeId, to: NodeId, max_hops: Option<usize>) -> Result<PathResult> {
        let max_hops = max_hops.unwrap_or(self.config.traversal.default_path_max_hops);
        self.cached(
            CacheKey::Path { from, to, max_hops },
            |hit| match hit {
                CachedResult::Path(p) => Some(p),
                _ => None,
            },
            CachedResult::Path,
            self.traversal.find_shortest_path(from, to, max_hops),
        )
        .await
    }

    pub async fn get_connected_component(&self, node_id: NodeId) -> Result<ComponentResult> {
        self.cached(
            CacheKey::Component { node: node_id },
            |hit| match hit {
                CachedResult::Component(c) => Some(c),
                _ => None,
            },
            CachedResult::Component,
            self.traversal.get_connected_component(node_id),
        )
        .await
    }

    pub async fn calculate_centrality(&self, node_ids: &[NodeId]) -> Result<BTreeMap<NodeId, f64>> {
        let set = bounded_set(node_ids, self.config.traversal.max_centrality_nodes, "centrality")?;
        self.traversal.calculate_centrality(&set).await
    }

    pub async fn extract_subgraph(&self, node_ids: &[NodeId]) -> Result<GraphNeighborhood> {
        let set = bounded_set(node_ids, self.config.traversal.max_subgraph_nodes, "subgraph")?;
        self.traversal.extract_subgraph(&set).await
    }

    pub async fn graph_statistics(&self) -> Result<GraphStats> {
        self.cached(
            CacheKey::Stats,
            |hit| match hit {
                CachedResult::Stats(s) => Some(s),
                _ => None,
            },
            CachedResult::Stats,
            self.traversal.graph_statistics(),
        )
        .await
    }

    pub async fn hybrid_search(
        &self,
        query: &str,
        lexical_weight: Option<f64>,
        vector_weight: Option<f64>,
        page: Option<usize>,
        size: Option<usize>,
    ) -> Result<SearchPage> {
        let page = self.page_request(query, page, size)?;
        let weights = self.search.resolve_weights(lexical_weight, vector_weight)?;
        self.cached(
            CacheKey::search(query, Some(weights), page.page, page.size),
            |hit| match hit {
                CachedResult::Search(s) => Some(s),
                _ => None,
            },
            CachedResult::Search,
            async {
                self.search
                    .hybrid_search(query, Some(weights.lexical), Some(weights.vector), page)
                    .await
                    .map_err(KgError::from)
            },
        )
        .await
    }

    pub async fn adaptive_hybrid_search(&self, query: &str, page: Option<usize>, size: Option<usize>) -> Result<SearchPage> {
        let page = self.page_request(query, page, size)?;
        self.cached(
            CacheKey::search(query, None, page.page, page.size),
            |hit| match hit {
                CachedResult::Search(s) => Some(s),
                _ => None,
            },
            CachedResult::Search,
            async { self.search.adaptive_hybrid_search(query, page).await.map_err(KgError::from) },
        )
        .await
    }

    fn page_request(&self, query: &str, page: Option<usize>, size: Option<usize>) -> Result<PageRequest> {
        if query.trim().is_empty() {
            return Err(KgError::invalid_input("query must not be blank"));
        }
        let size = size.unwrap_or(self.config.search.default_page_size);
        let max = self.config.search.max_page_size;
        if size == 0 || size > max {
            return Err(KgError::invalid_input(format!("page size must lie in 1..={}, got {}", max, size)));
        }
        Ok(PageRequest::new(page.unwrap_or(0), size))
    }

    /// Serve from the cache when possible, otherwise compute and store.
    ///
    /// Failures are never cached.
    async fn cached<T, F>(
        &self,
        key: CacheKey,
        extract: impl FnOnce(CachedResult) -> Option<T>,
        wrap: impl FnOnce(T) -> CachedResult,
        compute: F,
    ) -> Result<T>
    where
        T: Clone,
        F: Future<Output = Result<T>>,
    {
        let Some(cache) = &self.cache else {
            return compute.await;
        };

        if let Some(hit) = cache.get(&key).await.and_then(extract) {
            debug!("Serving {} from cache", key.namespace());
            return Ok(hit);
        }

        let value = compute.await?;
        cache
            .put(key, wrap(value.clone()), Duration::from_secs(self.config.cache.ttl_seconds))
            .await;
        Ok(value)
    }
}

fn bounded_set(node_ids: &[NodeId], max: usize, what: &str) -> Result<BTreeSet<NodeId>> {
    let set: BTreeSet<NodeId> = node_ids.iter().copied().collect();
    if set.is_empty() || set.len() > max {
        return Err(KgError::invalid_input(format!(
            "{} node set must hold 1..={} distinct ids, got {}",
            what,
            max,
            set.len()
        )));
    }
    Ok(set)
}
