//! Property graph records: nodes, directed edges and embeddings.

use crate::id::{DocumentId, EdgeId, EmbeddingId, EntityId, NodeId};
use crate::types::search::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Free-form attribute map. Ordered so serialized results are stable.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Semantic type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Entity,
    Concept,
    Section,
    Reference,
    Note,
    System,
    Person,
    Organization,
    Event,
    Place,
    Item,
    Document,
    Location,
    Project,
}

impl NodeType {
    pub const ALL: [NodeType; 14] = [
        Self::Entity,
        Self::Concept,
        Self::Section,
        Self::Reference,
        Self::Note,
        Self::System,
        Self::Person,
        Self::Organization,
        Self::Event,
        Self::Place,
        Self::Item,
        Self::Document,
        Self::Location,
        Self::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Concept => "concept",
            Self::Section => "section",
            Self::Reference => "reference",
            Self::Note => "note",
            Self::System => "system",
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Event => "event",
            Self::Place => "place",
            Self::Item => "item",
            Self::Document => "document",
            Self::Location => "location",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown node type: {}", s))
    }
}

/// Semantic type of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    AffiliatedWith,
    ParticipatedIn,
    LocatedIn,
    PartOf,
    References,
    ProducedBy,
    SimilarTo,
}

impl EdgeType {
    pub const ALL: [EdgeType; 7] = [
        Self::AffiliatedWith,
        Self::ParticipatedIn,
        Self::LocatedIn,
        Self::PartOf,
        Self::References,
        Self::ProducedBy,
        Self::SimilarTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AffiliatedWith => "affiliated_with",
            Self::ParticipatedIn => "participated_in",
            Self::LocatedIn => "located_in",
            Self::PartOf => "part_of",
            Self::References => "references",
            Self::ProducedBy => "produced_by",
            Self::SimilarTo => "similar_to",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown edge type: {}", s))
    }
}

/// A typed graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub source_uri: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            node_type,
            name: name.into(),
            attributes: Attributes::new(),
            source_uri: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }
}

/// A directed, typed edge between two nodes.
///
/// Both endpoints are expected to exist, but a concurrent deletion can leave
/// an edge dangling; readers skip such edges instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(id: EdgeId, source_id: NodeId, target_id: NodeId, edge_type: EdgeType) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_id,
            target_id,
            edge_type,
            attributes: Attributes::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The endpoint opposite `node`, or `None` if the edge does not touch it.
    pub fn other_endpoint(&self, node: &NodeId) -> Option<NodeId> {
        if self.source_id == *node {
            Some(self.target_id)
        } else if self.target_id == *node {
            Some(self.source_id)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }
}

/// A vector embedding attached to a node or a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub id: EmbeddingId,
    #[serde(default)]
    pub node_id: Option<NodeId>,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    pub vector: Vec<f32>,
    #[serde(default = "default_model_version")]
    pub model_version: String,
    #[serde(default)]
    pub content_snippet: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_model_version() -> String {
    "mock".to_string()
}

impl Embedding {
    pub fn for_node(id: EmbeddingId, node_id: NodeId, vector: Vec<f32>) -> Self {
        Self {
            id,
            node_id: Some(node_id),
            document_id: None,
            vector,
            model_version: default_model_version(),
            content_snippet: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_document(id: EmbeddingId, document_id: DocumentId, vector: Vec<f32>) -> Self {
        Self {
            id,
            node_id: None,
            document_id: Some(document_id),
            vector,
            model_version: default_model_version(),
            content_snippet: None,
            created_at: Utc::now(),
        }
    }

    /// The entity this embedding resolves to when joining vector hits.
    ///
    /// A node owner takes precedence over a document owner; an embedding
    /// with neither is unreachable from retrieval.
    pub fn owner(&self) -> Option<(EntityId, EntityKind)> {
        match (self.node_id, self.document_id) {
            (Some(node), _) => Some((node.into(), EntityKind::Node)),
            (None, Some(doc)) => Some((doc.into(), EntityKind::Document)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parse() {
        assert_eq!("PERSON".parse::<NodeType>().unwrap(), NodeType::Person);
        assert_eq!("organization".parse::<NodeType>().unwrap(), NodeType::Organization);
        assert!("planet".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_edge_type_parse() {
        assert_eq!("located-in".parse::<EdgeType>().unwrap(), EdgeType::LocatedIn);
        assert_eq!("AFFILIATED_WITH".parse::<EdgeType>().unwrap(), EdgeType::AffiliatedWith);
    }

    #[test]
    fn test_edge_other_endpoint() {
        let a = NodeId::from_u128(1);
        let b = NodeId::from_u128(2);
        let edge = Edge::new(EdgeId::from_u128(10), a, b, EdgeType::PartOf);

        assert_eq!(edge.other_endpoint(&a), Some(b));
        assert_eq!(edge.other_endpoint(&b), Some(a));
        assert_eq!(edge.other_endpoint(&NodeId::from_u128(3)), None);
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn test_embedding_owner_prefers_node() {
        let node = NodeId::from_u128(1);
        let mut embedding = Embedding::for_node(EmbeddingId::from_u128(5), node, vec![1.0]);
        embedding.document_id = Some(DocumentId::from_u128(9));

        let (owner, kind) = embedding.owner().unwrap();
        assert_eq!(owner, EntityId::from(node));
        assert_eq!(kind, EntityKind::Node);

        embedding.node_id = None;
        embedding.document_id = None;
        assert!(embedding.owner().is_none());
    }

    #[test]
    fn test_node_deserializes_with_defaults() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000001","type":"person","name":"Ada"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeType::Person);
        assert!(node.attributes.is_empty());
    }
}
