//! The knowledge graph aggregate
//!
//! The graph owns its nodes and edges and keeps two invariants:
//!
//! - every edge endpoint refers to a node of this graph
//! - no two nodes share a label
//!
//! The label lookup lives on the graph itself, so independent graphs can be
//! built side by side without sharing state.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::cluster::Cluster;
use super::edge::DirectedKnowledgeEdge;
use super::node::KnowledgeNode;

/// A labeled knowledge graph built from one language model response
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeGraph {
    /// Unique identifier for the graph
    pub id: String,
    /// Identifier of the owner the graph was built for
    pub owner_id: String,
    nodes: Vec<KnowledgeNode>,
    edges: Vec<DirectedKnowledgeEdge>,
    /// When the graph was created
    pub created_at: DateTime<Utc>,
    /// Time spent building the graph (parsing and clustering)
    pub build_duration: Duration,
    /// Clusters computed for the graph, empty until clustering runs
    pub clusters: Vec<Cluster>,
    #[serde(skip)]
    label_index: HashMap<String, String>,
    #[serde(skip)]
    id_index: HashMap<String, usize>,
}

impl KnowledgeGraph {
    /// Create an empty graph for an owner
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            created_at: Utc::now(),
            build_duration: Duration::ZERO,
            clusters: Vec::new(),
            label_index: HashMap::new(),
            id_index: HashMap::new(),
        }
    }

    /// Return the ID of the node with `label`, creating it if needed
    ///
    /// The importance is validated even when the node already exists, since a
    /// record carrying an out-of-range importance is unusable as a whole. An
    /// existing node keeps the importance it was created with.
    pub fn get_or_insert_node(&mut self, label: &str, importance: i32) -> Result<String> {
        let candidate = KnowledgeNode::new(label, importance)?;

        if let Some(existing) = self.label_index.get(label) {
            return Ok(existing.clone());
        }

        let id = candidate.id.clone();
        self.label_index.insert(candidate.label.clone(), id.clone());
        self.id_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(candidate);

        Ok(id)
    }

    /// Add a directed edge between two existing nodes
    pub fn add_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        label: impl Into<String>,
    ) -> Result<String> {
        let source_idx = *self
            .id_index
            .get(source_id)
            .ok_or_else(|| Error::UnknownNode(source_id.to_string()))?;
        if !self.id_index.contains_key(target_id) {
            return Err(Error::UnknownNode(target_id.to_string()));
        }

        let edge = DirectedKnowledgeEdge::new(source_id, target_id, label);
        let id = edge.id.clone();
        self.nodes[source_idx].add_neighbor(target_id);
        self.edges.push(edge);

        Ok(id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[KnowledgeNode] {
        &self.nodes
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[DirectedKnowledgeEdge] {
        &self.edges
    }

    /// Get a node by ID
    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.id_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Get a node by label
    pub fn node_by_label(&self, label: &str) -> Option<&KnowledgeNode> {
        self.label_index.get(label).and_then(|id| self.node(id))
    }

    /// Position of a node in `nodes()`
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges leaving a node
    pub fn outgoing_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a DirectedKnowledgeEdge> + 'a {
        self.edges.iter().filter(move |e| e.source_id == node_id)
    }

    /// Edges arriving at a node
    pub fn incoming_edges<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a DirectedKnowledgeEdge> + 'a {
        self.edges.iter().filter(move |e| e.target_id == node_id)
    }

    /// Summary counts for logging and display
    pub fn stats(&self) -> GraphStats {
        let isolated_nodes = self
            .nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.touches(&n.id)))
            .count();

        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            cluster_count: self.clusters.len(),
            isolated_nodes,
        }
    }
}

/// Summary counts for a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub cluster_count: usize,
    pub isolated_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = KnowledgeGraph::new("owner-1");

        assert_eq!(graph.owner_id, "owner-1");
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.clusters.is_empty());
        assert_eq!(graph.build_duration, Duration::ZERO);
    }

    #[test]
    fn test_nodes_deduplicated_by_label() {
        let mut graph = KnowledgeGraph::new("owner");

        let first = graph.get_or_insert_node("Chlorophyll", 2).unwrap();
        let second = graph.get_or_insert_node("Chlorophyll", 1).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
        // Importance fixed at first sighting
        assert_eq!(graph.node(&first).unwrap().importance, 2);
    }

    #[test]
    fn test_invalid_importance_leaves_graph_untouched() {
        let mut graph = KnowledgeGraph::new("owner");

        assert!(matches!(
            graph.get_or_insert_node("bad", 9),
            Err(Error::InvalidImportance(9))
        ));
        assert!(graph.is_empty());
        assert!(graph.node_by_label("bad").is_none());
    }

    #[test]
    fn test_add_edge_updates_neighbors() {
        let mut graph = KnowledgeGraph::new("owner");
        let a = graph.get_or_insert_node("a", 1).unwrap();
        let b = graph.get_or_insert_node("b", 1).unwrap();

        graph.add_edge(&a, &b, "links").unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.node(&a).unwrap().points_to(&b));
        assert!(!graph.node(&b).unwrap().points_to(&a));
        assert_eq!(graph.outgoing_edges(&a).count(), 1);
        assert_eq!(graph.incoming_edges(&b).count(), 1);
        assert_eq!(graph.incoming_edges(&a).count(), 0);
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoints() {
        let mut graph = KnowledgeGraph::new("owner");
        let a = graph.get_or_insert_node("a", 1).unwrap();

        assert!(matches!(
            graph.add_edge(&a, "missing", "x"),
            Err(Error::UnknownNode(id)) if id == "missing"
        ));
        assert!(matches!(
            graph.add_edge("missing", &a, "x"),
            Err(Error::UnknownNode(_))
        ));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node(&a).unwrap().out_degree(), 0);
    }

    #[test]
    fn test_lookup_by_label_and_index() {
        let mut graph = KnowledgeGraph::new("owner");
        graph.get_or_insert_node("first", 0).unwrap();
        let second = graph.get_or_insert_node("second", 3).unwrap();

        assert_eq!(graph.node_by_label("second").unwrap().id, second);
        assert_eq!(graph.node_index(&second), Some(1));
        assert!(graph.contains_node(&second));
        assert!(!graph.contains_node("nope"));
    }

    #[test]
    fn test_stats() {
        let mut graph = KnowledgeGraph::new("owner");
        let a = graph.get_or_insert_node("a", 1).unwrap();
        let b = graph.get_or_insert_node("b", 1).unwrap();
        graph.get_or_insert_node("lonely", 0).unwrap();
        graph.add_edge(&a, &b, "").unwrap();

        let stats = graph.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.cluster_count, 0);
        assert_eq!(stats.isolated_nodes, 1);
    }

    #[test]
    fn test_serializes_without_indexes() {
        let mut graph = KnowledgeGraph::new("owner");
        graph.get_or_insert_node("a", 1).unwrap();

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["owner_id"], "owner");
        assert_eq!(json["nodes"][0]["label"], "a");
        assert!(json.get("label_index").is_none());
    }
}
