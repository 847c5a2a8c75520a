//! Directed knowledge edges

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A labeled relation from one node to another
///
/// Edges are only created by the graph itself, which checks that both
/// endpoints exist. They are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectedKnowledgeEdge {
    /// Unique identifier for the edge
    pub id: String,
    /// ID of the source node
    pub source_id: String,
    /// ID of the target node
    pub target_id: String,
    /// Free-text relation description (may be empty)
    pub label: String,
}

impl DirectedKnowledgeEdge {
    pub(crate) fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: label.into(),
        }
    }

    /// Whether the edge starts and ends at the same node
    pub fn is_self_loop(&self) -> bool {
        self.source_id == self.target_id
    }

    /// Whether `node_id` is one of the edge's endpoints
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}
