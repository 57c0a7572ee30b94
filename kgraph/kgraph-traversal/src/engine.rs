//! Traversal engine facade over a shared graph accessor.

use crate::centrality::{annotate_centrality, degree_centrality};
use crate::component::connected_component;
use crate::neighborhood::neighborhood;
use crate::path::shortest_path;
use crate::stats::graph_statistics;
use crate::subgraph::extract_subgraph;
use kgraph_core::{
    ComponentResult, Deadline, GraphAccessor, GraphNeighborhood, GraphScan, GraphStats, NodeId, PathResult, Result,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

/// Runs structural queries against a graph.
///
/// Each query gets a fresh [`Deadline`] derived from the configured timeout.
/// The engine holds no per-query state and can be shared across tasks.
pub struct GraphTraversal<G: ?Sized> {
    graph: Arc<G>,
    timeout: Option<Duration>,
}

impl<G: ?Sized> Clone for GraphTraversal<G> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            timeout: self.timeout,
        }
    }
}

impl<G: ?Sized> GraphTraversal<G> {
    pub fn new(graph: Arc<G>) -> Self {
        Self { graph, timeout: None }
    }

    /// Bound every query by `timeout`; a zero duration disables the bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    fn deadline(&self) -> Deadline {
        self.timeout.map(Deadline::after).unwrap_or_default()
    }
}

impl<G: GraphAccessor + ?Sized> GraphTraversal<G> {
    /// Nodes within `hops` of `node_id`, tagged with hop levels
    pub async fn get_neighborhood(&self, node_id: NodeId, hops: usize) -> Result<GraphNeighborhood> {
        neighborhood(self.graph.as_ref(), node_id, hops, self.deadline()).await
    }

    /// Like [`get_neighborhood`](Self::get_neighborhood), with centrality
    /// computed over the returned nodes
    pub async fn get_neighborhood_with_centrality(&self, node_id: NodeId, hops: usize) -> Result<GraphNeighborhood> {
        let mut result = self.get_neighborhood(node_id, hops).await?;
        annotate_centrality(&mut result);
        Ok(result)
    }

    pub async fn find_shortest_path(&self, from: NodeId, to: NodeId, max_hops: usize) -> Result<PathResult> {
        shortest_path(self.graph.as_ref(), from, to, max_hops, self.deadline()).await
    }

    pub async fn get_connected_component(&self, node_id: NodeId) -> Result<ComponentResult> {
        connected_component(self.graph.as_ref(), node_id, self.deadline()).await
    }

    pub async fn calculate_centrality(&self, node_ids: &BTreeSet<NodeId>) -> Result<BTreeMap<NodeId, f64>> {
        degree_centrality(self.graph.as_ref(), node_ids).await
    }

    pub async fn extract_subgraph(&self, node_ids: &BTreeSet<NodeId>) -> Result<GraphNeighborhood> {
        extract_subgraph(self.graph.as_ref(), node_ids).await
    }
}

impl<G: GraphScan + ?Sized> GraphTraversal<G> {
    pub async fn graph_statistics(&self) -> Result<GraphStats> {
        graph_statistics(self.graph.as_ref()).await
    }
}
