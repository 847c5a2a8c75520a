//! Language model response parsing
//!
//! Turns the quasi-structured text a language model returns into a
//! [`KnowledgeGraph`](crate::domain::graph::KnowledgeGraph). Each record
//! block contributes two nodes and one directed edge; malformed records are
//! isolated according to an [`IncompleteRecordPolicy`].

mod parser;
mod record;

pub use parser::{IncompleteRecordPolicy, ParseOutcome, ResponseParser, SkippedRecord};
