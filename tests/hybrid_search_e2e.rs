//! Hybrid and adaptive search over the fixture snapshot.

use kgraph_core::{EntityId, EntityKind, LexicalSearchAdapter, SearchType};
use kgraph_integration_tests::*;
use kgraph_search::InMemoryLexicalIndex;
use std::collections::HashSet;

/// Lexical ranking of the fixture, computed independently of the service.
async fn lexical_ranking(query: &str) -> Vec<EntityId> {
    let index = InMemoryLexicalIndex::new();
    for node in fixture_nodes() {
        index.index_node(&node);
    }
    for document in fixture_documents() {
        index.index_text(document.id, EntityKind::Document, &document.text());
    }
    index
        .search(query)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.entity_id)
        .collect()
}

#[tokio::test]
async fn test_hybrid_search_ranks_matching_entities_first() {
    let service = fixture_service().unwrap();
    let page = service
        .hybrid_search("analytical engine", None, None, None, None)
        .await
        .unwrap();

    assert_eq!(page.search_type, SearchType::Hybrid);
    assert_eq!(page.query, "analytical engine");
    assert!(page.total_elements >= 2);

    let top = page.results[0].entity_id;
    assert!(top == EntityId::from(ANALYTICAL_ENGINE) || top == EntityId::from(NOTES_DOC));

    for (i, result) in page.results.iter().enumerate() {
        assert_eq!(result.rank, i + 1);
        assert!((0.0..=1.0 + 1e-9).contains(&result.score));
    }
    for pair in page.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(page.max_score, Some(page.results[0].score));
}

#[tokio::test]
async fn test_lexical_only_weights_reproduce_lexical_ranking() {
    let service = fixture_service().unwrap();
    let expected = lexical_ranking("difference engine").await;
    assert!(!expected.is_empty());

    let page = service
        .hybrid_search("difference engine", Some(1.0), None, None, Some(50))
        .await
        .unwrap();
    assert!((page.weights.lexical - 1.0).abs() < 1e-12);
    assert_eq!(page.weights.vector, 0.0);

    let leading: Vec<EntityId> = page.results.iter().take(expected.len()).map(|r| r.entity_id).collect();
    assert_eq!(leading, expected);
}

#[tokio::test]
async fn test_pages_partition_the_ranking() {
    let service = fixture_service().unwrap();
    let first = service.hybrid_search("engine", None, None, Some(0), Some(5)).await.unwrap();
    let second = service.hybrid_search("engine", None, None, Some(1), Some(5)).await.unwrap();

    assert_eq!(first.total_elements, second.total_elements);
    assert_eq!(first.total_pages, first.total_elements.div_ceil(5));
    assert_eq!(second.current_page, 1);

    let first_ids: HashSet<EntityId> = first.results.iter().map(|r| r.entity_id).collect();
    assert!(second.results.iter().all(|r| !first_ids.contains(&r.entity_id)));
    if let Some(r) = second.results.first() {
        assert_eq!(r.rank, 6);
    }

    let faceted: usize = first.type_facets.values().sum();
    assert_eq!(faceted, first.total_elements);
}

#[tokio::test]
async fn test_single_result_pages_walk_one_ranking() {
    let service = fixture_service().unwrap();
    let whole = service.hybrid_search("engine", None, None, Some(0), Some(50)).await.unwrap();
    assert!(whole.total_elements > 2);

    let mut walked = Vec::new();
    for number in 0..whole.total_elements {
        let page = service.hybrid_search("engine", None, None, Some(number), Some(1)).await.unwrap();
        assert_eq!(page.total_elements, whole.total_elements);
        assert_eq!(page.max_score, whole.max_score);
        assert_eq!(page.type_facets, whole.type_facets);
        walked.extend(page.results.into_iter().map(|r| r.entity_id));
    }

    let expected: Vec<EntityId> = whole.results.iter().map(|r| r.entity_id).collect();
    assert_eq!(walked, expected);
}

#[tokio::test]
async fn test_documents_and_nodes_are_both_retrievable() {
    let service = fixture_service().unwrap();
    let page = service
        .hybrid_search("babbage london", None, None, None, Some(50))
        .await
        .unwrap();

    let ids: HashSet<EntityId> = page.results.iter().map(|r| r.entity_id).collect();
    assert!(ids.contains(&EntityId::from(HISTORY_DOC)));
    assert!(ids.contains(&EntityId::from(BABBAGE)));
    assert!(page.type_facets.contains_key(&EntityKind::Document));
    assert!(page.type_facets.contains_key(&EntityKind::Node));
}

#[tokio::test]
async fn test_unmatched_terms_have_no_lexical_score() {
    let service = fixture_service().unwrap();
    let page = service.hybrid_search("zyxwv", None, None, None, None).await.unwrap();
    assert!(page.results.iter().all(|r| r.raw_lexical_score.is_none()));
}

#[tokio::test]
async fn test_adaptive_search_reports_its_weights() {
    let service = fixture_service().unwrap();
    let page = service
        .adaptive_hybrid_search("analytical engine", None, Some(10))
        .await
        .unwrap();

    assert_eq!(page.search_type, SearchType::AdaptiveHybrid);
    assert!((page.weights.lexical + page.weights.vector - 1.0).abs() < 1e-9);
    assert!(page.total_elements >= 2);
}

#[tokio::test]
async fn test_repeated_search_is_stable() {
    let service = fixture_service().unwrap();
    let first = service.hybrid_search("Engine", None, None, None, None).await.unwrap();
    let second = service.hybrid_search("  engine ", None, None, None, None).await.unwrap();
    assert_eq!(first.results, second.results);
}
