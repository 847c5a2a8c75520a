//! Hierarchical agglomerative clustering
//!
//! Groups the nodes of a [`KnowledgeGraph`](crate::domain::graph::KnowledgeGraph)
//! into clusters for visualization:
//!
//! - **ClusteringEngine**: the merge loop over a priority queue of candidates
//! - **StoppingCriteria**: cluster-count and distance limits
//! - **SemanticSimilarity**: pluggable meaning-closeness score
//! - **ClusterPair**: a merge candidate inside the queue

mod criteria;
mod engine;
mod pair;
mod similarity;

pub use criteria::{StopReason, StoppingCriteria};
pub use engine::{ClusteringEngine, ClusteringOutcome};
pub use pair::ClusterPair;
pub use similarity::{ConstantSimilarity, DEFAULT_SIMILARITY, SemanticSimilarity};
