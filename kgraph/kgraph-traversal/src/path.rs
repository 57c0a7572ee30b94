//! Unweighted shortest paths.

use crate::accessor::neighbor_ids;
use kgraph_core::{Deadline, GraphAccessor, KgError, NodeId, PathResult, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, instrument};

/// Find a shortest undirected path from `from` to `to` of at most `max_hops`
/// edges.
///
/// Neighbors are enqueued in ascending id order, so among equal-length
/// paths the one returned is stable across runs. An unreachable or unknown
/// `to` yields a not-found result, while an unknown `from` is an error.
#[instrument(skip(graph, deadline), fields(from = %from, to = %to))]
pub async fn shortest_path<G>(
    graph: &G,
    from: NodeId,
    to: NodeId,
    max_hops: usize,
    deadline: Deadline,
) -> Result<PathResult>
where
    G: GraphAccessor + ?Sized,
{
    if graph.node(&from).await?.is_none() {
        return Err(KgError::node_not_found(from));
    }
    if from == to {
        return Ok(PathResult::found(from, to, vec![from]));
    }

    let mut queue = VecDeque::from([(from, 0usize)]);
    let mut visited = HashSet::from([from]);
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut level = 0;

    while let Some((current, depth)) = queue.pop_front() {
        if current == to {
            let path = reconstruct(&parent, to);
            debug!("Found path of length {}", path.len() - 1);
            return Ok(PathResult::found(from, to, path));
        }
        if depth >= max_hops {
            continue;
        }
        if depth > level {
            level = depth;
            deadline.check("shortest path search")?;
        }

        for neighbor in neighbor_ids(graph, &current).await? {
            if visited.insert(neighbor) {
                parent.insert(neighbor, current);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    debug!("No path within {} hops", max_hops);
    Ok(PathResult::not_found(from, to))
}

fn reconstruct(parent: &HashMap<NodeId, NodeId>, to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut node = to;
    while let Some(p) = parent.get(&node) {
        path.push(*p);
        node = *p;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGraph;
    use kgraph_core::{Edge, EdgeId, EdgeType, Node, NodeType};

    fn n(v: u128) -> NodeId {
        NodeId::from_u128(v)
    }

    fn graph(edges: &[(u128, u128)]) -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for i in 1..=6 {
            graph.insert_node(Node::new(n(i), NodeType::Concept, format!("t{}", i)));
        }
        for (k, (a, b)) in edges.iter().enumerate() {
            graph.insert_edge(Edge::new(EdgeId::from_u128(100 + k as u128), n(*a), n(*b), EdgeType::PartOf));
        }
        graph
    }

    #[tokio::test]
    async fn test_shortest_path() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        let result = shortest_path(&g, n(1), n(4), 5, Deadline::none()).await.unwrap();
        assert!(result.found);
        assert_eq!(result.path, vec![n(1), n(2), n(3), n(4)]);
        assert_eq!(result.distance, 3);
    }

    #[tokio::test]
    async fn test_path_ignores_edge_direction() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        let result = shortest_path(&g, n(4), n(1), 5, Deadline::none()).await.unwrap();
        assert_eq!(result.path, vec![n(4), n(3), n(2), n(1)]);
    }

    #[tokio::test]
    async fn test_same_node() {
        let g = graph(&[]);
        let result = shortest_path(&g, n(2), n(2), 5, Deadline::none()).await.unwrap();
        assert!(result.found);
        assert_eq!(result.path, vec![n(2)]);
        assert_eq!(result.distance, 0);
    }

    #[tokio::test]
    async fn test_tie_break_prefers_lower_ids() {
        // 1 - 3 - 5 and 1 - 2 - 5: both length 2
        let g = graph(&[(1, 3), (3, 5), (1, 2), (2, 5)]);
        for _ in 0..5 {
            let result = shortest_path(&g, n(1), n(5), 5, Deadline::none()).await.unwrap();
            assert_eq!(result.path, vec![n(1), n(2), n(5)]);
        }
    }

    #[tokio::test]
    async fn test_hop_limit() {
        let g = graph(&[(1, 2), (2, 3), (3, 4)]);
        let result = shortest_path(&g, n(1), n(4), 2, Deadline::none()).await.unwrap();
        assert!(!result.found);
        assert_eq!(result.distance, -1);
        assert!(result.path.is_empty());

        let result = shortest_path(&g, n(1), n(4), 3, Deadline::none()).await.unwrap();
        assert!(result.found);
    }

    #[tokio::test]
    async fn test_disconnected() {
        let g = graph(&[(1, 2), (5, 6)]);
        let result = shortest_path(&g, n(1), n(6), 5, Deadline::none()).await.unwrap();
        assert!(!result.found);
    }

    #[tokio::test]
    async fn test_unknown_endpoints() {
        let g = graph(&[(1, 2)]);
        let err = shortest_path(&g, n(99), n(1), 5, Deadline::none()).await.unwrap_err();
        assert!(err.is_not_found());

        let result = shortest_path(&g, n(1), n(99), 5, Deadline::none()).await.unwrap();
        assert!(!result.found);
    }
}
