//! Knowledge nodes
//!
//! A node is a labeled concept extracted from text. The label is the
//! deduplication key within a graph; the importance is a coarse rating the
//! language model assigns to the concept.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Lowest accepted importance rating
pub const MIN_IMPORTANCE: i32 = 0;

/// Highest accepted importance rating
pub const MAX_IMPORTANCE: i32 = 3;

/// A concept in the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    /// Unique identifier for the node
    pub id: String,
    /// Human-readable label, unique within one graph
    pub label: String,
    /// Importance rating in [0, 3]
    pub importance: u8,
    /// IDs of nodes this node points to through an outgoing edge
    pub neighbor_ids: BTreeSet<String>,
}

impl KnowledgeNode {
    /// Create a new node, rejecting importance values outside [0, 3]
    pub fn new(label: impl Into<String>, importance: i32) -> Result<Self> {
        let importance = validate_importance(importance)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            importance,
            neighbor_ids: BTreeSet::new(),
        })
    }

    /// Check whether an outgoing edge from this node reaches `node_id`
    pub fn points_to(&self, node_id: &str) -> bool {
        self.neighbor_ids.contains(node_id)
    }

    /// Number of distinct outgoing neighbors
    pub fn out_degree(&self) -> usize {
        self.neighbor_ids.len()
    }

    pub(crate) fn add_neighbor(&mut self, node_id: &str) {
        self.neighbor_ids.insert(node_id.to_string());
    }
}

fn validate_importance(importance: i32) -> Result<u8> {
    if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
        return Err(Error::InvalidImportance(importance));
    }
    Ok(importance as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = KnowledgeNode::new("Photosynthesis", 3).unwrap();

        assert!(!node.id.is_empty());
        assert_eq!(node.label, "Photosynthesis");
        assert_eq!(node.importance, 3);
        assert!(node.neighbor_ids.is_empty());
    }

    #[test]
    fn test_importance_bounds() {
        assert!(KnowledgeNode::new("low", 0).is_ok());
        assert!(KnowledgeNode::new("high", 3).is_ok());

        assert!(matches!(
            KnowledgeNode::new("too high", 4),
            Err(Error::InvalidImportance(4))
        ));
        assert!(matches!(
            KnowledgeNode::new("negative", -1),
            Err(Error::InvalidImportance(-1))
        ));
    }

    #[test]
    fn test_unique_ids() {
        let a = KnowledgeNode::new("same", 1).unwrap();
        let b = KnowledgeNode::new("same", 1).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_neighbors_are_a_set() {
        let mut node = KnowledgeNode::new("a", 1).unwrap();
        node.add_neighbor("b");
        node.add_neighbor("b");

        assert_eq!(node.out_degree(), 1);
        assert!(node.points_to("b"));
        assert!(!node.points_to("c"));
    }
}
