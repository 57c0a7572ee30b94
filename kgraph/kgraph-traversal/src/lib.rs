//! Graph traversal engine for kgraph.
//!
//! Implements the structural queries over a [`GraphAccessor`]:
//! - bounded, hop-annotated neighborhoods (level-synchronous BFS)
//! - deterministic unweighted shortest paths
//! - connected components over the undirected view
//! - degree centrality restricted to an induced subgraph
//! - induced subgraph extraction and whole-graph statistics
//!
//! All traversals are iterative (explicit queue plus visited set), treat
//! edges as undirected for reachability, visit neighbors in ascending node id
//! order, and skip dangling edges instead of failing. A [`Deadline`] is
//! consulted between BFS levels.
//!
//! # Example
//!
//! ```no_run
//! use kgraph_core::{Edge, EdgeId, EdgeType, Node, NodeId, NodeType};
//! use kgraph_traversal::{GraphTraversal, InMemoryGraph};
//! use std::sync::Arc;
//!
//! # async fn example() -> kgraph_core::Result<()> {
//! let graph = Arc::new(InMemoryGraph::new());
//! let a = NodeId::new();
//! let b = NodeId::new();
//! graph.insert_node(Node::new(a, NodeType::Person, "Ada"));
//! graph.insert_node(Node::new(b, NodeType::Organization, "Analytical Society"));
//! graph.insert_edge(Edge::new(EdgeId::new(), a, b, EdgeType::AffiliatedWith));
//!
//! let traversal = GraphTraversal::new(graph);
//! let neighborhood = traversal.get_neighborhood(a, 1).await?;
//! assert_eq!(neighborhood.total_nodes, 2);
//! # Ok(())
//! # }
//! ```
//!
//! [`GraphAccessor`]: kgraph_core::GraphAccessor
//! [`Deadline`]: kgraph_core::Deadline

pub mod accessor;
pub mod centrality;
pub mod component;
pub mod engine;
pub mod memory;
pub mod neighborhood;
pub mod path;
pub mod stats;
pub mod subgraph;

pub use centrality::{annotate_centrality, degree_centrality, induced_degree_scores};
pub use component::connected_component;
pub use engine::GraphTraversal;
pub use memory::InMemoryGraph;
pub use neighborhood::neighborhood;
pub use path::shortest_path;
pub use stats::graph_statistics;
pub use subgraph::extract_subgraph;
