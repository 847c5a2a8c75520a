//! Node clusters
//!
//! A cluster is a non-empty group of nodes judged to be closely related. It
//! holds node IDs only; the nodes themselves stay owned by the graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::knowledge_graph::KnowledgeGraph;
use super::node::KnowledgeNode;

/// A group of related nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique identifier for the cluster
    pub id: String,
    /// IDs of the member nodes
    pub node_ids: Vec<String>,
}

impl Cluster {
    /// Create a cluster holding a single node
    pub fn singleton(node_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            node_ids: vec![node_id.into()],
        }
    }

    /// Merge two clusters into a new one
    ///
    /// The result gets a fresh ID; members of `first` come before members of
    /// `second`.
    pub fn merge(first: Cluster, second: Cluster) -> Self {
        let mut node_ids = first.node_ids;
        node_ids.extend(second.node_ids);

        Self {
            id: Uuid::new_v4().to_string(),
            node_ids,
        }
    }

    /// Number of member nodes
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    /// Always false for clusters built through `singleton` and `merge`
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Check membership of a node
    pub fn contains(&self, node_id: &str) -> bool {
        self.node_ids.iter().any(|id| id == node_id)
    }

    /// Resolve member nodes against the graph the cluster was computed from
    pub fn nodes<'g>(
        &'g self,
        graph: &'g KnowledgeGraph,
    ) -> impl Iterator<Item = &'g KnowledgeNode> + 'g {
        self.node_ids.iter().filter_map(|id| graph.node(id))
    }

    /// Member labels in member order
    pub fn labels<'g>(&'g self, graph: &'g KnowledgeGraph) -> Vec<&'g str> {
        self.nodes(graph).map(|n| n.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton() {
        let cluster = Cluster::singleton("n-1");
        assert_eq!(cluster.len(), 1);
        assert!(!cluster.is_empty());
        assert!(cluster.contains("n-1"));
    }

    #[test]
    fn test_merge_concatenates_members() {
        let a = Cluster::singleton("n-1");
        let b = Cluster::merge(Cluster::singleton("n-2"), Cluster::singleton("n-3"));
        let (a_id, b_id) = (a.id.clone(), b.id.clone());

        let merged = Cluster::merge(a, b);

        assert_eq!(merged.node_ids, vec!["n-1", "n-2", "n-3"]);
        assert_ne!(merged.id, a_id);
        assert_ne!(merged.id, b_id);
    }

    #[test]
    fn test_resolve_nodes() {
        let mut graph = KnowledgeGraph::new("owner");
        let a = graph.get_or_insert_node("alpha", 1).unwrap();
        let b = graph.get_or_insert_node("beta", 2).unwrap();

        let cluster = Cluster::merge(Cluster::singleton(&a), Cluster::singleton(&b));
        assert_eq!(cluster.labels(&graph), vec!["alpha", "beta"]);
    }
}
