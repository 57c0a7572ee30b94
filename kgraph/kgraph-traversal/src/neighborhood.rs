//! Bounded neighborhood expansion.

use crate::accessor::sorted_neighbors;
use kgraph_core::{
    Adjacency, Deadline, GraphAccessor, GraphEdge, GraphNeighborhood, GraphNode, KgError, NodeId, Result,
};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Collect every node within `hops` undirected edge traversals of `center`.
///
/// Level-synchronous BFS: a node takes the hop level at which it is first
/// discovered, an edge takes the level of the frontier expansion that first
/// crossed it, and each edge appears once. `actual_hops` is the deepest
/// level that produced a new node.
#[instrument(skip(graph, deadline), fields(center = %center))]
pub async fn neighborhood<G>(graph: &G, center: NodeId, hops: usize, deadline: Deadline) -> Result<GraphNeighborhood>
where
    G: GraphAccessor + ?Sized,
{
    let center_node = graph
        .node(&center)
        .await?
        .ok_or_else(|| KgError::node_not_found(center))?;

    let mut levels: HashMap<NodeId, usize> = HashMap::from([(center, 0)]);
    let mut nodes = vec![GraphNode::from_node(&center_node, Some(0))];
    let mut edges = Vec::new();
    let mut seen_edges = HashSet::new();
    let mut frontier = vec![center];
    let mut actual_hops = 0;

    for hop in 1..=hops {
        if frontier.is_empty() {
            break;
        }
        deadline.check("neighborhood expansion")?;

        let mut next = Vec::new();
        for current in &frontier {
            for Adjacency { edge, other } in sorted_neighbors(graph, current).await? {
                if !seen_edges.insert(edge.id) {
                    continue;
                }
                edges.push(GraphEdge::from_edge(&edge, Some(hop)));

                if let Entry::Vacant(slot) = levels.entry(other.id) {
                    slot.insert(hop);
                    nodes.push(GraphNode::from_node(&other, Some(hop)));
                    next.push(other.id);
                }
            }
        }

        if !next.is_empty() {
            actual_hops = hop;
        }
        frontier = next;
    }

    debug!(
        "Neighborhood of {}: {} nodes, {} edges, {} of {} hops",
        center,
        nodes.len(),
        edges.len(),
        actual_hops,
        hops
    );

    Ok(GraphNeighborhood::centered(center, hops, actual_hops, nodes, edges))
}
