//! Deterministic neighbor access shared by all traversals.

use kgraph_core::{Adjacency, GraphAccessor, NodeId, Result};
use tracing::warn;

/// Incident edges of `id` ordered by (far-end node id, edge id).
///
/// A node that disappeared after it was discovered is treated as having no
/// neighbors. Only the traversal's starting node has to exist, and callers
/// check that separately.
pub async fn sorted_neighbors<G>(graph: &G, id: &NodeId) -> Result<Vec<Adjacency>>
where
    G: GraphAccessor + ?Sized,
{
    let mut adjacent = match graph.neighbors(id).await {
        Ok(adjacent) => adjacent,
        Err(e) if e.is_not_found() => {
            warn!("Node {} vanished during traversal, skipping", id);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };
    adjacent.sort_by(|a, b| (a.other.id, a.edge.id).cmp(&(b.other.id, b.edge.id)));
    Ok(adjacent)
}

/// Distinct far-end node ids of `id`, ascending.
pub async fn neighbor_ids<G>(graph: &G, id: &NodeId) -> Result<Vec<NodeId>>
where
    G: GraphAccessor + ?Sized,
{
    let mut ids: Vec<NodeId> = sorted_neighbors(graph, id)
        .await?
        .into_iter()
        .map(|a| a.other.id)
        .collect();
    ids.dedup();
    Ok(ids)
}
