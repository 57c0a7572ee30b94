//! Shared fixtures for the kgraph integration tests.
//!
//! The fixture graph is a small history-of-computing graph:
//!
//! ```text
//! Lady Byron -> Ada Lovelace -> Analytical Engine -> Charles Babbage
//!                                Difference Engine -> Charles Babbage
//!               Charles Babbage -> London, Charles Babbage -> Royal Society
//!               Royal Society -> London
//!               Mars Rover (isolated)
//! ```

use kgraph_cli::{GraphSnapshot, KnowledgeGraphService, SourceDocument};
use kgraph_core::{DocumentId, Edge, EdgeId, EdgeType, KgConfig, Node, NodeId, NodeType, Result};

pub const ADA: NodeId = NodeId::from_u128(1);
pub const BABBAGE: NodeId = NodeId::from_u128(2);
pub const ANALYTICAL_ENGINE: NodeId = NodeId::from_u128(3);
pub const DIFFERENCE_ENGINE: NodeId = NodeId::from_u128(4);
pub const LONDON: NodeId = NodeId::from_u128(5);
pub const ROYAL_SOCIETY: NodeId = NodeId::from_u128(6);
pub const BYRON: NodeId = NodeId::from_u128(7);
pub const MARS_ROVER: NodeId = NodeId::from_u128(8);

pub const NOTES_DOC: DocumentId = DocumentId::from_u128(0xd1);
pub const HISTORY_DOC: DocumentId = DocumentId::from_u128(0xd2);

/// Edge id in the fixture graph.
pub fn edge(id: u128) -> EdgeId {
    EdgeId::from_u128(id)
}

pub fn fixture_nodes() -> Vec<Node> {
    vec![
        Node::new(ADA, NodeType::Person, "Ada Lovelace").with_attribute("born", 1815),
        Node::new(BABBAGE, NodeType::Person, "Charles Babbage").with_attribute("field", "mathematics"),
        Node::new(ANALYTICAL_ENGINE, NodeType::Concept, "Analytical Engine"),
        Node::new(DIFFERENCE_ENGINE, NodeType::Concept, "Difference Engine"),
        Node::new(LONDON, NodeType::Location, "London"),
        Node::new(ROYAL_SOCIETY, NodeType::Organization, "Royal Society"),
        Node::new(BYRON, NodeType::Person, "Lady Byron"),
        Node::new(MARS_ROVER, NodeType::Entity, "Mars Rover"),
    ]
}

pub fn fixture_edges() -> Vec<Edge> {
    vec![
        Edge::new(edge(101), ADA, ANALYTICAL_ENGINE, EdgeType::References),
        Edge::new(edge(102), ANALYTICAL_ENGINE, BABBAGE, EdgeType::ProducedBy),
        Edge::new(edge(103), DIFFERENCE_ENGINE, BABBAGE, EdgeType::ProducedBy),
        Edge::new(edge(104), BABBAGE, LONDON, EdgeType::LocatedIn),
        Edge::new(edge(105), BABBAGE, ROYAL_SOCIETY, EdgeType::AffiliatedWith),
        Edge::new(edge(106), ROYAL_SOCIETY, LONDON, EdgeType::LocatedIn),
        Edge::new(edge(107), BYRON, ADA, EdgeType::References),
    ]
}

pub fn fixture_documents() -> Vec<SourceDocument> {
    vec![
        SourceDocument {
            id: NOTES_DOC,
            title: "Notes on the Analytical Engine".to_string(),
            content: "Ada Lovelace published the first algorithm intended for the analytical engine".to_string(),
        },
        SourceDocument {
            id: HISTORY_DOC,
            title: "A history of the difference engine".to_string(),
            content: "Charles Babbage designed the difference engine while living in London".to_string(),
        },
    ]
}

pub fn fixture_snapshot() -> GraphSnapshot {
    GraphSnapshot {
        nodes: fixture_nodes(),
        edges: fixture_edges(),
        documents: fixture_documents(),
        embeddings: Vec::new(),
    }
}

/// Configuration used by the fixtures: defaults, with a vector threshold
/// loose enough for hashed embeddings to produce candidates.
pub fn fixture_config() -> KgConfig {
    let mut config = KgConfig::default();
    config.search.vector_threshold = 0.1;
    config
}

pub fn fixture_service() -> Result<KnowledgeGraphService> {
    KnowledgeGraphService::from_snapshot(fixture_snapshot(), fixture_config())
}
