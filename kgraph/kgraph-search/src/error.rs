//! Error types for hybrid search.

use kgraph_core::KgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("{adapter} search failed: {source}")]
    Adapter {
        adapter: &'static str,
        #[source]
        source: KgError,
    },
}

impl SearchError {
    pub fn lexical(source: KgError) -> Self {
        Self::Adapter {
            adapter: "lexical",
            source,
        }
    }

    pub fn vector(source: KgError) -> Self {
        Self::Adapter {
            adapter: "vector",
            source,
        }
    }

    /// Whether the caller sent a bad request, as opposed to a backend failure
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::Adapter { .. })
    }
}

impl From<SearchError> for KgError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Adapter { adapter, source } => KgError::adapter(adapter, source.to_string()),
            other => KgError::invalid_input(other.to_string()),
        }
    }
}
