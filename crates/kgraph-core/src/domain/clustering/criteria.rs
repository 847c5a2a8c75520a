//! Stopping criteria for agglomerative clustering

use serde::{Deserialize, Serialize};

use crate::domain::graph::KnowledgeGraph;

/// When the merge loop should stop
///
/// Both limits are supplied by the caller. The distance limit is optional;
/// `None` lets merging continue as long as any candidate pair exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoppingCriteria {
    /// Stop once this many clusters (or fewer) remain
    pub max_clusters: usize,
    /// Stop when the closest pair is farther apart than this
    pub max_distance: Option<f64>,
}

impl StoppingCriteria {
    /// Criteria with both a cluster-count and a distance limit
    pub fn new(max_clusters: usize, max_distance: f64) -> Self {
        Self {
            max_clusters,
            max_distance: Some(max_distance),
        }
    }

    /// Criteria limited by cluster count only
    pub fn unbounded(max_clusters: usize) -> Self {
        Self {
            max_clusters,
            max_distance: None,
        }
    }

    /// Derive the cluster-count limit from a target cluster size
    ///
    /// A graph of `n` nodes gets `n / nodes_per_cluster` clusters at most.
    pub fn for_graph(
        graph: &KnowledgeGraph,
        nodes_per_cluster: usize,
        max_distance: Option<f64>,
    ) -> Self {
        Self {
            max_clusters: graph.node_count() / nodes_per_cluster.max(1),
            max_distance,
        }
    }

    /// Whether a pair at `distance` may still be merged
    pub fn allows_distance(&self, distance: f64) -> bool {
        self.max_distance.is_none_or(|max| distance <= max)
    }
}

/// Why a clustering run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The cluster count reached the configured maximum
    MaxClusters,
    /// No pair of clusters is connected by a graph path
    NoCandidates,
    /// The closest pair exceeded the distance threshold
    DistanceThreshold,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxClusters => "max_clusters",
            Self::NoCandidates => "no_candidates",
            Self::DistanceThreshold => "distance_threshold",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
