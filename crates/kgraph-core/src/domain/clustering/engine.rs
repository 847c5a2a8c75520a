//! Hierarchical agglomerative clustering over a knowledge graph
//!
//! Every node starts in its own cluster. The engine keeps a min-heap of
//! candidate pairs keyed by inter-cluster distance and repeatedly merges the
//! closest pair until the [`StoppingCriteria`] say stop.
//!
//! ## Distance
//!
//! The cost of a node pair is
//!
//! ```text
//! (graph_distance + (1 - semantic_similarity)) / 2
//! ```
//!
//! where `graph_distance` is the BFS hop count (1 for direct neighbors).
//! Node pairs without a connecting path have no cost at all and never become
//! merge candidates. The distance between two clusters is the smallest cost
//! over their node pairs (single linkage).
//!
//! ## Updates after a merge
//!
//! With single linkage the distance from a merged cluster to any survivor is
//! the smaller of the two retired clusters' distances to it, so a merge only
//! pushes one new pair per surviving cluster. Pairs that still reference a
//! retired cluster stay in the heap and are discarded when they surface.

use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::graph::{Adjacency, Cluster, KnowledgeGraph, TraversalDirection};

use super::criteria::{StopReason, StoppingCriteria};
use super::pair::ClusterPair;
use super::similarity::{ConstantSimilarity, SemanticSimilarity, bounded};

/// Result of one clustering run
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringOutcome {
    /// Final clusters, partitioning the graph's nodes
    pub clusters: Vec<Cluster>,
    /// Number of merges performed
    pub merges: usize,
    /// Why the merge loop ended
    pub stop_reason: StopReason,
}

/// Agglomerative clustering engine
#[derive(Clone)]
pub struct ClusteringEngine {
    similarity: Arc<dyn SemanticSimilarity>,
    direction: TraversalDirection,
}

impl ClusteringEngine {
    /// Engine with the placeholder similarity and undirected traversal
    pub fn new() -> Self {
        Self {
            similarity: Arc::new(ConstantSimilarity::default()),
            direction: TraversalDirection::Both,
        }
    }

    /// Replace the semantic similarity strategy
    pub fn with_similarity(mut self, similarity: impl SemanticSimilarity + 'static) -> Self {
        self.similarity = Arc::new(similarity);
        self
    }

    /// Share an existing similarity strategy
    pub fn with_shared_similarity(mut self, similarity: Arc<dyn SemanticSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Set which edges count when measuring graph distance
    ///
    /// With [`TraversalDirection::Outgoing`] a node pair uses the shorter of
    /// its two directed distances, so cluster distances stay symmetric.
    pub fn with_direction(mut self, direction: TraversalDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn direction(&self) -> TraversalDirection {
        self.direction
    }

    /// Partition the graph's nodes into clusters
    pub fn cluster(&self, graph: &KnowledgeGraph, criteria: &StoppingCriteria) -> Vec<Cluster> {
        self.run(graph, criteria).clusters
    }

    /// Cluster the graph and store the clusters on it
    pub fn annotate(
        &self,
        graph: &mut KnowledgeGraph,
        criteria: &StoppingCriteria,
    ) -> ClusteringOutcome {
        let outcome = self.run(graph, criteria);
        graph.clusters = outcome.clusters.clone();
        outcome
    }

    /// Run the merge loop, reporting merge count and stop reason
    pub fn run(&self, graph: &KnowledgeGraph, criteria: &StoppingCriteria) -> ClusteringOutcome {
        let node_count = graph.node_count();
        let mut slots: Vec<Option<Cluster>> = graph
            .nodes()
            .iter()
            .map(|node| Some(Cluster::singleton(&node.id)))
            .collect();
        let mut remaining = node_count;

        let hops = self.hop_distances(graph);
        let mut distances: HashMap<(usize, usize), f64> = HashMap::new();
        let mut heap = BinaryHeap::new();

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                if let Some(cost) = self.node_cost(graph, &hops, i, j) {
                    distances.insert((i, j), cost);
                    heap.push(ClusterPair::new(i, j, cost));
                }
            }
        }

        let mut merges = 0;
        let stop_reason = loop {
            if remaining <= criteria.max_clusters {
                break StopReason::MaxClusters;
            }

            while heap
                .peek()
                .is_some_and(|p| slots[p.left].is_none() || slots[p.right].is_none())
            {
                heap.pop();
            }

            let Some(next) = heap.pop() else {
                break StopReason::NoCandidates;
            };
            if !criteria.allows_distance(next.distance) {
                break StopReason::DistanceThreshold;
            }

            // Both slots are live: stale pairs were discarded above
            let (Some(left), Some(right)) = (slots[next.left].take(), slots[next.right].take())
            else {
                continue;
            };
            debug!(
                distance = next.distance,
                left_size = left.len(),
                right_size = right.len(),
                "Merging clusters"
            );

            let merged_slot = slots.len();
            slots.push(Some(Cluster::merge(left, right)));
            remaining -= 1;
            merges += 1;

            for other in 0..merged_slot {
                if slots[other].is_none() {
                    continue;
                }
                let via_left = distances.get(&slot_key(next.left, other)).copied();
                let via_right = distances.get(&slot_key(next.right, other)).copied();
                if let Some(distance) = min_defined(via_left, via_right) {
                    distances.insert((other, merged_slot), distance);
                    heap.push(ClusterPair::new(other, merged_slot, distance));
                }
            }
        };

        let clusters: Vec<Cluster> = slots.into_iter().flatten().collect();

        info!(
            node_count,
            cluster_count = clusters.len(),
            merges,
            stop_reason = %stop_reason,
            "Clustering finished"
        );

        ClusteringOutcome {
            clusters,
            merges,
            stop_reason,
        }
    }

    /// BFS hop counts between every pair of nodes, indexed by node position
    fn hop_distances(&self, graph: &KnowledgeGraph) -> Vec<Vec<Option<usize>>> {
        let adjacency = Adjacency::build(graph, self.direction);
        (0..adjacency.len())
            .map(|start| adjacency.distances_from(start))
            .collect()
    }

    /// Cost of putting two nodes together, `None` when no path joins them
    fn node_cost(
        &self,
        graph: &KnowledgeGraph,
        hops: &[Vec<Option<usize>>],
        i: usize,
        j: usize,
    ) -> Option<f64> {
        let hop_count = match self.direction {
            TraversalDirection::Both => hops[i][j],
            TraversalDirection::Outgoing => min_defined(hops[i][j], hops[j][i]),
        }?;

        let nodes = graph.nodes();
        let similarity = bounded(self.similarity.similarity(&nodes[i], &nodes[j]));

        Some((hop_count as f64 + (1.0 - similarity)) / 2.0)
    }
}

impl Default for ClusteringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClusteringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusteringEngine")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

fn slot_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

fn min_defined<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if y < x { y } else { x }),
        (x, None) => x,
        (None, y) => y,
    }
}
