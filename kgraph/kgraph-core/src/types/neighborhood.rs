//! Result DTOs for structural graph queries.

use crate::id::{EdgeId, NodeId};
use crate::types::graph::{Attributes, Edge, EdgeType, Node, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A node as it appears in a neighborhood or subgraph result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub attributes: Attributes,
    /// Hop distance from the center; `None` for subgraphs without a center
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_level: Option<usize>,
    /// Degree centrality within the returned subgraph, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centrality: Option<f64>,
}

impl GraphNode {
    pub fn from_node(node: &Node, hop_level: Option<usize>) -> Self {
        Self {
            id: node.id,
            node_type: node.node_type,
            name: node.name.clone(),
            attributes: node.attributes.clone(),
            hop_level,
            centrality: None,
        }
    }
}

/// An edge as it appears in a neighborhood or subgraph result.
///
/// Direction is preserved even though traversal treats edges as undirected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_level: Option<usize>,
}

impl GraphEdge {
    pub fn from_edge(edge: &Edge, hop_level: Option<usize>) -> Self {
        Self {
            id: edge.id,
            source_id: edge.source_id,
            target_id: edge.target_id,
            edge_type: edge.edge_type,
            attributes: edge.attributes.clone(),
            hop_level,
        }
    }
}

/// Hop-annotated subgraph around a center node, or an induced subgraph.
///
/// `total_nodes` and `total_edges` always equal the list lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNeighborhood {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_node_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_hops: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hops: Option<usize>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// hop level -> number of nodes first discovered at that level
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nodes_per_hop: BTreeMap<usize, usize>,
    pub total_nodes: usize,
    pub total_edges: usize,
}

impl GraphNeighborhood {
    /// Build a centered neighborhood, deriving the histogram and totals.
    pub fn centered(
        center: NodeId,
        requested_hops: usize,
        actual_hops: usize,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    ) -> Self {
        let mut nodes_per_hop = BTreeMap::new();
        for node in &nodes {
            if let Some(hop) = node.hop_level {
                *nodes_per_hop.entry(hop).or_insert(0) += 1;
            }
        }

        Self {
            center_node_id: Some(center),
            requested_hops: Some(requested_hops),
            actual_hops: Some(actual_hops),
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            nodes,
            edges,
            nodes_per_hop,
        }
    }

    /// Build an uncentered (induced) subgraph.
    pub fn induced(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            center_node_id: None,
            requested_hops: None,
            actual_hops: None,
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            nodes,
            edges,
            nodes_per_hop: BTreeMap::new(),
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}

/// Outcome of a shortest-path query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub from: NodeId,
    pub to: NodeId,
    /// Node ids from `from` to `to` inclusive; empty when not found
    pub path: Vec<NodeId>,
    /// `path.len() - 1`, or -1 when not found
    pub distance: i64,
    pub found: bool,
}

impl PathResult {
    pub fn found(from: NodeId, to: NodeId, path: Vec<NodeId>) -> Self {
        let distance = path.len() as i64 - 1;
        Self {
            from,
            to,
            path,
            distance,
            found: true,
        }
    }

    pub fn not_found(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            path: Vec::new(),
            distance: -1,
            found: false,
        }
    }
}

/// The connected component containing a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub node_id: NodeId,
    pub component_size: usize,
    pub node_ids: BTreeSet<NodeId>,
}

impl ComponentResult {
    pub fn new(node_id: NodeId, node_ids: BTreeSet<NodeId>) -> Self {
        Self {
            node_id,
            component_size: node_ids.len(),
            node_ids,
        }
    }
}

/// Whole-graph statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub node_types: BTreeMap<NodeType, usize>,
    pub edge_types: BTreeMap<EdgeType, usize>,
    /// Mean number of incident non-dangling edges per node
    pub avg_connections_per_node: f64,
    pub dangling_edges: usize,
}
