//! Knowledge graph data model
//!
//! - **KnowledgeNode**: a labeled concept with an importance rating
//! - **DirectedKnowledgeEdge**: a labeled relation between two nodes
//! - **KnowledgeGraph**: owns nodes and edges, deduplicates nodes by label
//! - **Cluster**: a group of related node IDs
//!
//! Shortest-path queries live in [`GraphAlgorithms`].

mod algorithms;
mod cluster;
mod edge;
mod knowledge_graph;
mod node;

pub use algorithms::{Adjacency, GraphAlgorithms, TraversalDirection};
pub use cluster::Cluster;
pub use edge::DirectedKnowledgeEdge;
pub use knowledge_graph::{GraphStats, KnowledgeGraph};
pub use node::{KnowledgeNode, MAX_IMPORTANCE, MIN_IMPORTANCE};
