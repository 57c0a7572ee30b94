//! Degree centrality restricted to an induced subgraph.
//!
//! A node's score is the number of distinct other members of the set it is
//! adjacent to, divided by `|set| - 1`. Scores therefore lie in `[0, 1]`:
//! 0 for a node with no induced edges (or a one-member set), 1 for a node
//! adjacent to every other member. Self-loops and parallel edges do not
//! count twice.

use kgraph_core::{GraphAccessor, GraphNeighborhood, NodeId, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, instrument, warn};

/// Centrality scores from the induced edge list of `members`.
///
/// Pairs with an endpoint outside `members` are ignored.
pub fn induced_degree_scores<I>(members: &BTreeSet<NodeId>, edges: I) -> BTreeMap<NodeId, f64>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let mut adjacency: HashSet<(NodeId, NodeId)> = HashSet::new();
    for (a, b) in edges {
        if a == b || !members.contains(&a) || !members.contains(&b) {
            continue;
        }
        adjacency.insert((a, b));
        adjacency.insert((b, a));
    }

    let denominator = members.len().saturating_sub(1);
    let mut degrees: BTreeMap<NodeId, usize> = members.iter().map(|id| (*id, 0)).collect();
    for (a, _) in &adjacency {
        if let Some(degree) = degrees.get_mut(a) {
            *degree += 1;
        }
    }

    degrees
        .into_iter()
        .map(|(id, degree)| {
            let score = if denominator == 0 {
                0.0
            } else {
                degree as f64 / denominator as f64
            };
            (id, score)
        })
        .collect()
}

/// Degree centrality of each requested node within the subgraph induced by
/// the whole request.
///
/// Ids that do not exist in the graph still occupy a slot in the
/// denominator and score 0.
#[instrument(skip(graph, node_ids), fields(set_size = node_ids.len()))]
pub async fn degree_centrality<G>(graph: &G, node_ids: &BTreeSet<NodeId>) -> Result<BTreeMap<NodeId, f64>>
where
    G: GraphAccessor + ?Sized,
{
    let mut induced = Vec::new();
    if node_ids.len() > 1 {
        for id in node_ids {
            let adjacent = match graph.neighbors(id).await {
                Ok(adjacent) => adjacent,
                Err(e) if e.is_not_found() => {
                    warn!("Centrality requested for unknown node {}", id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            induced.extend(
                adjacent
                    .into_iter()
                    .filter(|a| node_ids.contains(&a.other.id))
                    .map(|a| (*id, a.other.id)),
            );
        }
    }

    let scores = induced_degree_scores(node_ids, induced);
    debug!("Computed centrality for {} nodes", scores.len());
    Ok(scores)
}

/// Attach induced-subgraph centrality to every node of `neighborhood`.
pub fn annotate_centrality(neighborhood: &mut GraphNeighborhood) {
    let members = neighborhood.node_ids();
    let scores = induced_degree_scores(
        &members,
        neighborhood.edges.iter().map(|e| (e.source_id, e.target_id)),
    );
    for node in &mut neighborhood.nodes {
        node.centrality = scores.get(&node.id).copied();
    }
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

    /// Star around 1 with leaves 2, 3, 4 plus an outside node 5 tied to 2.
    fn star() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for i in 1..=5 {
            graph.insert_node(Node::new(n(i), NodeType::Person, format!("p{}", i)));
        }
        for (k, (a, b)) in [(1, 2), (1, 3), (4, 1), (2, 5)].iter().enumerate() {
            graph.insert_edge(Edge::new(EdgeId::from_u128(k as u128), n(*a), n(*b), EdgeType::AffiliatedWith));
        }
        graph
    }

    #[tokio::test]
    async fn test_hub_scores_one() {
        let set = BTreeSet::from([n(1), n(2), n(3), n(4)]);
        let scores = degree_centrality(&star(), &set).await.unwrap();
        assert_relative_eq!(scores[&n(1)], 1.0);
        assert_relative_eq!(scores[&n(2)], 1.0 / 3.0);
        assert_relative_eq!(scores[&n(4)], 1.0 / 3.0);
    }

    #[tokio::test]
    async fn test_edges_leaving_the_set_do_not_count() {
        let set = BTreeSet::from([n(2), n(3)]);
        let scores = degree_centrality(&star(), &set).await.unwrap();
        assert_relative_eq!(scores[&n(2)], 0.0);
        assert_relative_eq!(scores[&n(3)], 0.0);
    }

    #[tokio::test]
    async fn test_single_member_scores_zero() {
        let scores = degree_centrality(&star(), &BTreeSet::from([n(1)])).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_relative_eq!(scores[&n(1)], 0.0);
    }

    #[tokio::test]
    async fn test_unknown_member_scores_zero() {
        let set = BTreeSet::from([n(1), n(2), n(77)]);
        let scores = degree_centrality(&star(), &set).await.unwrap();
        assert_relative_eq!(scores[&n(77)], 0.0);
        assert_relative_eq!(scores[&n(1)], 0.5);
    }

    #[test]
    fn test_parallel_edges_and_self_loops_counted_once() {
        let members = BTreeSet::from([n(1), n(2)]);
        let scores = induced_degree_scores(&members, [(n(1), n(2)), (n(2), n(1)), (n(1), n(1))]);
        assert_relative_eq!(scores[&n(1)], 1.0);
        assert_relative_eq!(scores[&n(2)], 1.0);
    }
}
