//! Connected components over the undirected view of the graph.

use crate::accessor::neighbor_ids;
use kgraph_core::{ComponentResult, Deadline, GraphAccessor, KgError, NodeId, Result};
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, instrument};

/// All nodes reachable from `start` ignoring edge direction, `start` included.
#[instrument(skip(graph, deadline), fields(start = %start))]
pub async fn connected_component<G>(graph: &G, start: NodeId, deadline: Deadline) -> Result<ComponentResult>
where
    G: GraphAccessor + ?Sized,
{
    if graph.node(&start).await?.is_none() {
        return Err(KgError::node_not_found(start));
    }

    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([(start, 0usize)]);
    let mut level = 0;

    while let Some((current, depth)) = queue.pop_front() {
        if depth > level {
            level = depth;
            deadline.check("component search")?;
        }
        for neighbor in neighbor_ids(graph, &current).await? {
            if visited.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    debug!("Component of {} has {} nodes", start, visited.len());
    Ok(ComponentResult::new(start, visited))
}
