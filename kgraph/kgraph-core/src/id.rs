//! Unique identifier types for graph records.
//!
//! Identifiers are opaque UUID-backed keys. They order by their UUID bytes,
//! which is what traversal tie-breaking relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from a UUID
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Create an ID from a raw 128-bit value
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(
    /// Identifier of a graph node.
    NodeId
);

define_id!(
    /// Identifier of a directed graph edge.
    EdgeId
);

define_id!(
    /// Identifier of an embedding record.
    EmbeddingId
);

define_id!(
    /// Identifier of a source document.
    DocumentId
);

define_id!(
    /// Identifier of a retrievable entity: a node or a document.
    ///
    /// Search adapters report hits under this key; it shares the UUID space
    /// of [`NodeId`] and [`DocumentId`].
    EntityId
);

impl From<NodeId> for EntityId {
    fn from(id: NodeId) -> Self {
        Self(id.0)
    }
}

impl From<DocumentId> for EntityId {
    fn from(id: DocumentId) -> Self {
        Self(id.0)
    }
}
