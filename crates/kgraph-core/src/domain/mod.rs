//! Domain layer
//!
//! Contains the graph model and the algorithms that build and cluster it.

pub mod clustering;
pub mod graph;
pub mod parsing;
