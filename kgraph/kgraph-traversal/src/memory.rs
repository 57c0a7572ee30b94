//! In-memory graph accessor.
//!
//! Holds nodes and edges in adjacency maps behind a single lock. Removing a
//! node leaves its edges in place, which is exactly the dangling state a
//! concurrent deletion produces in external storage.

use async_trait::async_trait;
use kgraph_core::{Adjacency, Edge, EdgeId, GraphAccessor, GraphScan, KgError, Node, NodeId, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct GraphData {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    /// node -> edges leaving it, in insertion order
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    /// node -> edges entering it, in insertion order
    incoming: HashMap<NodeId, Vec<EdgeId>>,
}

/// Thread-safe in-memory property graph.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    data: RwLock<GraphData>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from node and edge lists.
    pub fn from_parts(nodes: impl IntoIterator<Item = Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let graph = Self::new();
        for node in nodes {
            graph.insert_node(node);
        }
        for edge in edges {
            graph.insert_edge(edge);
        }
        graph
    }

    /// Insert or replace a node.
    pub fn insert_node(&self, node: Node) {
        self.data.write().nodes.insert(node.id, node);
    }

    /// Insert or replace an edge.
    ///
    /// Endpoints are not required to exist; a dangling edge is stored and
    /// skipped on read.
    pub fn insert_edge(&self, edge: Edge) {
        let mut data = self.data.write();
        if !data.nodes.contains_key(&edge.source_id) || !data.nodes.contains_key(&edge.target_id) {
            warn!("Inserting edge {} with a missing endpoint", edge.id);
        }

        if let Some(previous) = data.edges.remove(&edge.id) {
            unlink(&mut data, &previous);
        }
        data.outgoing.entry(edge.source_id).or_default().push(edge.id);
        data.incoming.entry(edge.target_id).or_default().push(edge.id);
        data.edges.insert(edge.id, edge);
    }

    /// Remove a node, leaving its edges dangling.
    pub fn remove_node(&self, id: &NodeId) -> Option<Node> {
        self.data.write().nodes.remove(id)
    }

    pub fn remove_edge(&self, id: &EdgeId) -> Option<Edge> {
        let mut data = self.data.write();
        let edge = data.edges.remove(id)?;
        unlink(&mut data, &edge);
        Some(edge)
    }

    pub fn node_count(&self) -> usize {
        self.data.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.data.read().edges.len()
    }

    fn collect_neighbors(&self, id: &NodeId) -> Result<Vec<Adjacency>> {
        let data = self.data.read();
        if !data.nodes.contains_key(id) {
            return Err(KgError::node_not_found(id));
        }

        let incident = data
            .outgoing
            .get(id)
            .into_iter()
            .chain(data.incoming.get(id))
            .flatten();

        let mut seen = HashSet::new();
        let mut adjacent = Vec::new();
        for edge_id in incident {
            // A self-loop is listed as both outgoing and incoming
            if !seen.insert(*edge_id) {
                continue;
            }
            let Some(edge) = data.edges.get(edge_id) else {
                continue;
            };
            let Some(other_id) = edge.other_endpoint(id) else {
                continue;
            };
            match data.nodes.get(&other_id) {
                Some(other) => adjacent.push(Adjacency {
                    edge: edge.clone(),
                    other: other.clone(),
                }),
                None => debug!("Skipping dangling edge {}: node {} is missing", edge.id, other_id),
            }
        }

        Ok(adjacent)
    }
}

fn unlink(data: &mut GraphData, edge: &Edge) {
    if let Some(ids) = data.outgoing.get_mut(&edge.source_id) {
        ids.retain(|e| *e != edge.id);
    }
    if let Some(ids) = data.incoming.get_mut(&edge.target_id) {
        ids.retain(|e| *e != edge.id);
    }
}

#[async_trait]
impl GraphAccessor for InMemoryGraph {
    async fn node(&self, id: &NodeId) -> Result<Option<Node>> {
        Ok(self.data.read().nodes.get(id).cloned())
    }

    async fn neighbors(&self, id: &NodeId) -> Result<Vec<Adjacency>> {
        self.collect_neighbors(id)
    }
}

#[async_trait]
impl GraphScan for InMemoryGraph {
    async fn nodes(&self) -> Result<Vec<Node>> {
        let mut nodes: Vec<Node> = self.data.read().nodes.values().cloned().collect();
        nodes.sort_by_key(|n| n.id);
        Ok(nodes)
    }

    async fn edges(&self) -> Result<Vec<Edge>> {
        let mut edges: Vec<Edge> = self.data.read().edges.values().cloned().collect();
        edges.sort_by_key(|e| e.id);
        Ok(edges)
    }
}
