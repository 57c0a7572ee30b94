//! Whole-graph statistics.

use kgraph_core::{GraphScan, GraphStats, NodeId, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Count nodes and edges by type.
///
/// Edges with a missing endpoint are reported in `dangling_edges` and left
/// out of every other figure.
#[instrument(skip(graph))]
pub async fn graph_statistics<G>(graph: &G) -> Result<GraphStats>
where
    G: GraphScan + ?Sized,
{
    let nodes = graph.nodes().await?;
    let edges = graph.edges().await?;

    let ids: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let mut node_types = BTreeMap::new();
    for node in &nodes {
        *node_types.entry(node.node_type).or_insert(0) += 1;
    }

    let mut edge_types = BTreeMap::new();
    let mut total_edges = 0;
    let mut dangling_edges = 0;
    for edge in &edges {
        if ids.contains(&edge.source_id) && ids.contains(&edge.target_id) {
            total_edges += 1;
            *edge_types.entry(edge.edge_type).or_insert(0) += 1;
        } else {
            dangling_edges += 1;
        }
    }

    let avg_connections_per_node = if nodes.is_empty() {
        0.0
    } else {
        2.0 * total_edges as f64 / nodes.len() as f64
    };

    debug!(
        "Graph has {} nodes, {} edges ({} dangling)",
        nodes.len(),
        total_edges,
        dangling_edges
    );

    Ok(GraphStats {
        total_nodes: nodes.len(),
        total_edges,
        node_types,
        edge_types,
        avg_connections_per_node,
        dangling_edges,
    })
}
