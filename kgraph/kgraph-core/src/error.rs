//! Error types for the kgraph engine.

/// Result type alias for kgraph operations.
pub type Result<T> = std::result::Result<T, KgError>;

/// Main error type for the kgraph engine.
///
/// Dangling edge references are deliberately absent: they are recovered
/// locally by skipping the edge and never reach a caller.
#[derive(Debug, thiserror::Error)]
pub enum KgError {
    /// The queried node (or other resource) does not exist
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Bound violations, blank queries and similar precondition failures
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A lexical or vector search adapter failed
    #[error("Adapter '{adapter}' failed: {message}")]
    Adapter { adapter: String, message: String },

    /// A query deadline expired between traversal levels
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped anyhow errors for compatibility
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KgError {
    /// Create a new not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a not found error for a graph node
    pub fn node_not_found(id: impl ToString) -> Self {
        Self::not_found("node", id.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new adapter error
    pub fn adapter(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is an adapter failure
    pub fn is_adapter(&self) -> bool {
        matches!(self, Self::Adapter { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
