//! Induced subgraph extraction.

use crate::accessor::sorted_neighbors;
use crate::centrality::annotate_centrality;
use kgraph_core::{GraphAccessor, GraphEdge, GraphNeighborhood, GraphNode, NodeId, Result};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// The requested nodes plus every edge with both endpoints among them,
/// each node annotated with its induced-subgraph centrality.
///
/// Unknown ids are left out rather than failing the query.
#[instrument(skip(graph, node_ids), fields(set_size = node_ids.len()))]
pub async fn extract_subgraph<G>(graph: &G, node_ids: &BTreeSet<NodeId>) -> Result<GraphNeighborhood>
where
    G: GraphAccessor + ?Sized,
{
    let mut nodes = Vec::with_capacity(node_ids.len());
    for id in node_ids {
        match graph.node(id).await? {
            Some(node) => nodes.push(GraphNode::from_node(&node, None)),
            None => debug!("Subgraph member {} not found, skipping", id),
        }
    }

    let present: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let mut seen_edges = HashSet::new();
    let mut edges = Vec::new();
    for node in &nodes {
        for adjacency in sorted_neighbors(graph, &node.id).await? {
            if present.contains(&adjacency.other.id) && seen_edges.insert(adjacency.edge.id) {
                edges.push(GraphEdge::from_edge(&adjacency.edge, None));
            }
        }
    }

    let mut subgraph = GraphNeighborhood::induced(nodes, edges);
    annotate_centrality(&mut subgraph);
    Ok(subgraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGraph;
    use approx::assert_relative_eq;
    use kgraph_core::{Edge, EdgeId, EdgeType, Node, NodeType};

    fn n(v: u128) -> NodeId {
        NodeId::from_u128(v)
    }

    fn graph() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for i in 1..=4 {
            graph.insert_node(Node::new(n(i), NodeType::Location, format!("l{}", i)));
        }
        for (k, (a, b)) in [(1, 2), (2, 3), (3, 4), (1, 1)].iter().enumerate() {
            graph.insert_edge(Edge::new(EdgeId::from_u128(k as u128), n(*a), n(*b), EdgeType::LocatedIn));
        }
        graph
    }

    #[tokio::test]
    async fn test_only_internal_edges() {
        let set = BTreeSet::from([n(1), n(2), n(3)]);
        let subgraph = extract_subgraph(&graph(), &set).await.unwrap();

        assert_eq!(subgraph.total_nodes, 3);
        // 1-2, 2-3 and the self-loop on 1; 3-4 leaves the set
        assert_eq!(subgraph.total_edges, 3);
        assert!(subgraph.center_node_id.is_none());
        assert!(subgraph.nodes.iter().all(|n| n.hop_level.is_none()));
    }

    #[tokio::test]
    async fn test_nodes_carry_centrality() {
        let set = BTreeSet::from([n(1), n(2), n(3)]);
        let subgraph = extract_subgraph(&graph(), &set).await.unwrap();
        assert_relative_eq!(subgraph.node(&n(2)).unwrap().centrality.unwrap(), 1.0);
        assert_relative_eq!(subgraph.node(&n(1)).unwrap().centrality.unwrap(), 0.5);
    }

    #[tokio::test]
    async fn test_unknown_ids_skipped() {
        let set = BTreeSet::from([n(1), n(2), n(50)]);
        let subgraph = extract_subgraph(&graph(), &set).await.unwrap();
        assert_eq!(subgraph.total_nodes, 2);
        assert_eq!(subgraph.node_ids(), BTreeSet::from([n(1), n(2)]));
    }
}
