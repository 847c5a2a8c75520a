//! Semantic similarity between nodes
//!
//! The clustering cost mixes graph distance with a semantic term in [0, 1].
//! No embedding model is wired in yet, so the default strategy returns a
//! constant. Any [`SemanticSimilarity`] implementation (including a plain
//! closure) can be injected into the engine instead.

use crate::domain::graph::KnowledgeNode;

/// Placeholder similarity used until a real metric is available
pub const DEFAULT_SIMILARITY: f64 = 0.5;

/// Strategy scoring how close two nodes are in meaning
pub trait SemanticSimilarity: Send + Sync {
    /// Score in [0, 1]; the engine clamps values outside and reads NaN as 0
    fn similarity(&self, a: &KnowledgeNode, b: &KnowledgeNode) -> f64;
}

/// Returns the same score for every pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSimilarity {
    value: f64,
}

impl ConstantSimilarity {
    pub fn new(value: f64) -> Self {
        Self {
            value: bounded(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Default for ConstantSimilarity {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY)
    }
}

impl SemanticSimilarity for ConstantSimilarity {
    fn similarity(&self, _a: &KnowledgeNode, _b: &KnowledgeNode) -> f64 {
        self.value
    }
}

/// Clamp a score into [0, 1], treating NaN as unrelated
pub(crate) fn bounded(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

impl<F> SemanticSimilarity for F
where
    F: Fn(&KnowledgeNode, &KnowledgeNode) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &KnowledgeNode, b: &KnowledgeNode) -> f64 {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_similarity() {
        let a = KnowledgeNode::new("a", 1).unwrap();
        let b = KnowledgeNode::new("b", 1).unwrap();

        let default = ConstantSimilarity::default();
        assert_eq!(default.similarity(&a, &b), 0.5);
        assert_eq!(ConstantSimilarity::new(0.9).similarity(&a, &b), 0.9);
    }

    #[test]
    fn test_constant_is_clamped() {
        assert_eq!(ConstantSimilarity::new(1.7).value(), 1.0);
        assert_eq!(ConstantSimilarity::new(-0.2).value(), 0.0);
        assert_eq!(ConstantSimilarity::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(bounded(0.25), 0.25);
        assert_eq!(bounded(f64::INFINITY), 1.0);
        assert_eq!(bounded(f64::NEG_INFINITY), 0.0);
        assert_eq!(bounded(f64::NAN), 0.0);
    }

    #[test]
    fn test_closure_strategy() {
        let same_initial = |a: &KnowledgeNode, b: &KnowledgeNode| {
            if a.label.chars().next() == b.label.chars().next() {
                1.0
            } else {
                0.0
            }
        };

        let apple = KnowledgeNode::new("apple", 1).unwrap();
        let apricot = KnowledgeNode::new("apricot", 1).unwrap();
        let banana = KnowledgeNode::new("banana", 1).unwrap();

        assert_eq!(same_initial.similarity(&apple, &apricot), 1.0);
        assert_eq!(same_initial.similarity(&apple, &banana), 0.0);
    }
}
