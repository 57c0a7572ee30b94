//! Library for the kgraph CLI: snapshot loading, the service facade and
//! terminal output.

pub mod commands;
pub mod output;
pub mod service;
pub mod snapshot;

pub use output::OutputFormat;
pub use service::KnowledgeGraphService;
pub use snapshot::{GraphSnapshot, SourceDocument};
