//! Graph traversal algorithms
//!
//! Shortest-path distances are edge counts found by breadth-first search.
//! An unreachable target is reported as `None`, never as a large sentinel
//! number, so callers doing minimization cannot mistake it for a real
//! distance.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::knowledge_graph::KnowledgeGraph;

/// Which edges a traversal may follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// Only follow edges from source to target
    Outgoing,
    /// Follow edges regardless of their stored direction
    #[default]
    Both,
}

impl TraversalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "outgoing" | "out" | "directed" => Some(Self::Outgoing),
            "both" | "undirected" => Some(Self::Both),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraversalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shortest-path queries over a knowledge graph
pub struct GraphAlgorithms;

impl GraphAlgorithms {
    /// Edge-count distance from `from` to `to` following outgoing edges
    ///
    /// Returns `Some(0)` when both IDs are equal and `None` when `to` cannot
    /// be reached.
    pub fn distance(graph: &KnowledgeGraph, from: &str, to: &str) -> Option<usize> {
        Self::distance_with(graph, from, to, TraversalDirection::Outgoing)
    }

    /// Edge-count distance using the given traversal direction
    pub fn distance_with(
        graph: &KnowledgeGraph,
        from: &str,
        to: &str,
        direction: TraversalDirection,
    ) -> Option<usize> {
        if from == to {
            return Some(0);
        }

        let start = graph.node_index(from)?;
        let target = graph.node_index(to)?;

        Adjacency::build(graph, direction).distances_from(start)[target]
    }
}

/// Index-based adjacency lists for repeated traversals
///
/// Building this once and running one BFS per source node is how the
/// clustering engine gets all pairwise distances without rescanning the edge
/// list for every query.
#[derive(Debug, Clone)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Build adjacency lists from the graph's neighbor sets
    pub fn build(graph: &KnowledgeGraph, direction: TraversalDirection) -> Self {
        let mut neighbors = vec![Vec::new(); graph.node_count()];

        for (idx, node) in graph.nodes().iter().enumerate() {
            for neighbor_id in &node.neighbor_ids {
                let Some(neighbor_idx) = graph.node_index(neighbor_id) else {
                    continue;
                };
                neighbors[idx].push(neighbor_idx);
                if direction == TraversalDirection::Both {
                    neighbors[neighbor_idx].push(idx);
                }
            }
        }

        Self { neighbors }
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// BFS distances from `start` to every node (`None` when unreachable)
    pub fn distances_from(&self, start: usize) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.neighbors.len()];
        let mut queue = VecDeque::new();

        distances[start] = Some(0);
        queue.push_back((start, 0usize));

        while let Some((current, distance)) = queue.pop_front() {
            for &next in &self.neighbors[current] {
                if distances[next].is_none() {
                    distances[next] = Some(distance + 1);
                    queue.push_back((next, distance + 1));
                }
            }
        }

        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(labels: &[&str]) -> (KnowledgeGraph, Vec<String>) {
        let mut graph = KnowledgeGraph::new("owner");
        let ids: Vec<String> = labels
            .iter()
            .map(|l| graph.get_or_insert_node(l, 1).unwrap())
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(&pair[0], &pair[1], "next").unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let (graph, ids) = path_graph(&["a", "b"]);
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], &ids[0]), Some(0));
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[1], &ids[1]), Some(0));
    }

    #[test]
    fn test_path_distance() {
        let (graph, ids) = path_graph(&["A", "B", "C", "D"]);

        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], &ids[3]), Some(3));
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], &ids[1]), Some(1));
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[1], &ids[3]), Some(2));
    }

    #[test]
    fn test_outgoing_traversal_respects_direction() {
        let (graph, ids) = path_graph(&["A", "B", "C", "D"]);

        assert_eq!(GraphAlgorithms::distance(&graph, &ids[3], &ids[0]), None);
        assert_eq!(
            GraphAlgorithms::distance_with(&graph, &ids[3], &ids[0], TraversalDirection::Both),
            Some(3)
        );
    }

    #[test]
    fn test_disconnected_nodes_unreachable() {
        let mut graph = KnowledgeGraph::new("owner");
        let a = graph.get_or_insert_node("a", 1).unwrap();
        let b = graph.get_or_insert_node("b", 1).unwrap();

        assert_eq!(GraphAlgorithms::distance(&graph, &a, &b), None);
        assert_eq!(
            GraphAlgorithms::distance_with(&graph, &a, &b, TraversalDirection::Both),
            None
        );
    }

    #[test]
    fn test_unknown_node_is_unreachable() {
        let (graph, ids) = path_graph(&["a", "b"]);
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], "ghost"), None);
        assert_eq!(GraphAlgorithms::distance(&graph, "ghost", &ids[0]), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let (mut graph, ids) = path_graph(&["a", "b", "c"]);
        graph.add_edge(&ids[2], &ids[0], "back").unwrap();
        let lonely = graph.get_or_insert_node("lonely", 0).unwrap();

        assert_eq!(GraphAlgorithms::distance(&graph, &ids[2], &ids[1]), Some(2));
        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], &lonely), None);
    }

    #[test]
    fn test_shortest_of_several_paths() {
        let (mut graph, ids) = path_graph(&["a", "b", "c", "d"]);
        graph.add_edge(&ids[0], &ids[3], "shortcut").unwrap();

        assert_eq!(GraphAlgorithms::distance(&graph, &ids[0], &ids[3]), Some(1));
    }

    #[test]
    fn test_adjacency_distances_from() {
        let (graph, _) = path_graph(&["a", "b", "c"]);
        let adjacency = Adjacency::build(&graph, TraversalDirection::Both);

        assert_eq!(adjacency.len(), 3);
        assert_eq!(adjacency.distances_from(1), vec![Some(1), Some(0), Some(1)]);

        let directed = Adjacency::build(&graph, TraversalDirection::Outgoing);
        assert_eq!(directed.distances_from(1), vec![None, Some(0), Some(1)]);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(TraversalDirection::parse("outgoing"), Some(TraversalDirection::Outgoing));
        assert_eq!(TraversalDirection::parse("BOTH"), Some(TraversalDirection::Both));
        assert_eq!(TraversalDirection::parse("sideways"), None);
        assert_eq!(TraversalDirection::default(), TraversalDirection::Both);
    }
}
