//! Precondition checks and caching at the service boundary.

use kgraph_cli::KnowledgeGraphService;
use kgraph_core::{Edge, EdgeId, EdgeType, KgConfig, Node, NodeId, NodeType};
use kgraph_integration_tests::*;
use kgraph_search::{HashingEmbedder, InMemoryLexicalIndex, InMemoryVectorIndex, MokaResultCache};
use kgraph_traversal::InMemoryGraph;
use std::sync::Arc;

#[tokio::test]
async fn test_hops_outside_configured_range_rejected() {
    let service = fixture_service().unwrap();

    assert!(service.get_neighborhood(ADA, Some(0), false).await.unwrap_err().is_invalid_input());
    assert!(service.get_neighborhood(ADA, Some(4), false).await.unwrap_err().is_invalid_input());
    assert!(service.get_neighborhood(ADA, Some(3), false).await.is_ok());
}

#[tokio::test]
async fn test_default_hops_come_from_config() {
    let service = fixture_service().unwrap();
    let result = service.get_neighborhood(ADA, None, false).await.unwrap();
    assert_eq!(result.requested_hops, Some(service.config().traversal.default_hops));
}

#[tokio::test]
async fn test_unknown_center_is_not_found() {
    let service = fixture_service().unwrap();
    let err = service
        .get_neighborhood(NodeId::from_u128(99), Some(1), false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = service.get_connected_component(NodeId::from_u128(99)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_node_set_sizes_bounded() {
    let service = fixture_service().unwrap();

    assert!(service.extract_subgraph(&[]).await.unwrap_err().is_invalid_input());
    assert!(service.calculate_centrality(&[]).await.unwrap_err().is_invalid_input());

    let too_many: Vec<NodeId> = (1000..1101).map(NodeId::from_u128).collect();
    assert!(service.extract_subgraph(&too_many).await.unwrap_err().is_invalid_input());

    // Duplicates collapse before the bound is applied
    let repeated = vec![ADA; 500];
    let subgraph = service.extract_subgraph(&repeated).await.unwrap();
    assert_eq!(subgraph.total_nodes, 1);

    // The centrality bound is larger than the subgraph bound
    let scores = service.calculate_centrality(&too_many).await.unwrap();
    assert_eq!(scores.len(), 101);
    assert!(scores.values().all(|s| *s == 0.0));
}

#[tokio::test]
async fn test_search_arguments_validated() {
    let service = fixture_service().unwrap();

    assert!(service.hybrid_search("   ", None, None, None, None).await.unwrap_err().is_invalid_input());
    assert!(service.adaptive_hybrid_search("", None, None).await.unwrap_err().is_invalid_input());
    assert!(
        service
            .hybrid_search("engine", None, None, None, Some(0))
            .await
            .unwrap_err()
            .is_invalid_input()
    );
    assert!(
        service
            .hybrid_search("engine", None, None, None, Some(101))
            .await
            .unwrap_err()
            .is_invalid_input()
    );
    assert!(
        service
            .hybrid_search("engine", Some(0.0), Some(0.0), None, None)
            .await
            .unwrap_err()
            .is_invalid_input()
    );
    assert!(
        service
            .hybrid_search("engine", Some(-0.5), Some(1.5), None, None)
            .await
            .unwrap_err()
            .is_invalid_input()
    );
}

#[tokio::test]
async fn test_unnormalized_weights_are_scaled() {
    let service = fixture_service().unwrap();
    let page = service.hybrid_search("engine", Some(3.0), Some(1.0), None, None).await.unwrap();
    assert!((page.weights.lexical - 0.75).abs() < 1e-12);
    assert!((page.weights.vector - 0.25).abs() < 1e-12);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let service = fixture_service().unwrap();
    let page = service.hybrid_search("engine", None, None, Some(50), Some(10)).await.unwrap();
    assert!(page.results.is_empty());
    assert!(page.total_elements > 0);
    assert_eq!(page.current_page, 50);
}

fn mutable_service(graph: Arc<InMemoryGraph>, config: KgConfig) -> KnowledgeGraphService {
    let embedder = Arc::new(HashingEmbedder::default());
    KnowledgeGraphService::new(
        graph,
        Arc::new(InMemoryLexicalIndex::new()),
        Arc::new(InMemoryVectorIndex::new(embedder, 0.5)),
        config,
    )
}

#[tokio::test]
async fn test_cached_results_survive_graph_changes_until_expiry() {
    let graph = Arc::new(InMemoryGraph::from_parts(fixture_nodes(), fixture_edges()));
    let service = mutable_service(graph.clone(), fixture_config()).with_cache(Arc::new(MokaResultCache::new(100)));

    let before = service.get_neighborhood(MARS_ROVER, Some(1), false).await.unwrap();
    assert_eq!(before.total_nodes, 1);

    graph.insert_node(Node::new(NodeId::from_u128(50), NodeType::Event, "Landing"));
    graph.insert_edge(Edge::new(
        EdgeId::from_u128(500),
        MARS_ROVER,
        NodeId::from_u128(50),
        EdgeType::ParticipatedIn,
    ));

    let cached = service.get_neighborhood(MARS_ROVER, Some(1), false).await.unwrap();
    assert_eq!(cached, before);

    // A different key misses the cache and sees the new edge
    let fresh = service.get_neighborhood(MARS_ROVER, Some(2), false).await.unwrap();
    assert_eq!(fresh.total_nodes, 2);
}

#[tokio::test]
async fn test_uncached_service_sees_graph_changes() {
    let graph = Arc::new(InMemoryGraph::from_parts(fixture_nodes(), fixture_edges()));
    let service = mutable_service(graph.clone(), fixture_config());

    let stats = service.graph_statistics().await.unwrap();
    assert_eq!(stats.total_nodes, 8);

    graph.insert_node(Node::new(NodeId::from_u128(50), NodeType::Event, "Landing"));
    let stats = service.graph_statistics().await.unwrap();
    assert_eq!(stats.total_nodes, 9);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let graph = Arc::new(InMemoryGraph::from_parts(fixture_nodes(), fixture_edges()));
    let service = mutable_service(graph.clone(), fixture_config()).with_cache(Arc::new(MokaResultCache::new(100)));

    let missing = NodeId::from_u128(60);
    assert!(service.get_connected_component(missing).await.unwrap_err().is_not_found());

    graph.insert_node(Node::new(missing, NodeType::Concept, "Late arrival"));
    let component = service.get_connected_component(missing).await.unwrap();
    assert_eq!(component.component_size, 1);
}
