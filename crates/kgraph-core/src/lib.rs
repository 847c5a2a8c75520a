//! kgraph Core Library
//!
//! This crate provides the core functionality for kgraph, including:
//! - Parsing of language model responses into knowledge graphs
//! - Shortest-path distance over directed knowledge edges
//! - Hierarchical agglomerative clustering of graph nodes
//! - Text normalization and prompt construction
//! - Configuration persisted as TOML

pub mod config;
pub mod domain;
pub mod error;
pub mod extraction;
pub mod text;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::clustering::{ClusteringEngine, StoppingCriteria};
    pub use crate::domain::graph::{GraphAlgorithms, KnowledgeGraph};
    pub use crate::domain::parsing::{IncompleteRecordPolicy, ResponseParser};
    pub use crate::error::{Error, Result};
    pub use crate::extraction::{KnowledgeExtractor, LanguageModel, RecordedResponse};
}
