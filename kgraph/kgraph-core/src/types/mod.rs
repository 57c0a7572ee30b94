//! Data model and request-scoped result types.

pub mod graph;
pub mod neighborhood;
pub mod search;

pub use graph::*;
pub use neighborhood::*;
pub use search::*;
