//! Line-oriented parser for language model responses
//!
//! The model is asked for a list of JSON-like records, but its output cannot
//! be trusted to deserialize: one stray character would make a whole-document
//! parse fail. The parser therefore walks trimmed, non-empty lines through a
//! small state machine:
//!
//! - `{` opens a record
//! - `"key": value` lines fill the open record
//! - `},` closes the record and adds its two nodes and edge to the graph
//!
//! Anything else is ignored. A record still open when the next `{` arrives is
//! abandoned without being applied or reported. A record still open when the
//! input ends is closed as if `},` had been seen.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::graph::KnowledgeGraph;
use crate::error::{Error, Result};

use super::record::{CompletedRecord, PendingRecord, RecordField};

const OPEN_RECORD: &str = "{";
const CLOSE_RECORD: &str = "},";

/// What to do with a record that cannot be turned into an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteRecordPolicy {
    /// Drop the record, log it and keep parsing
    #[default]
    Skip,
    /// Fail the whole parse on the first bad record
    Abort,
}

impl IncompleteRecordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncompleteRecordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record dropped under [`IncompleteRecordPolicy::Skip`]
#[derive(Debug)]
pub struct SkippedRecord {
    /// Line of the record's opening brace
    pub start_line: usize,
    /// Why the record was dropped
    pub error: Error,
}

/// Result of a parse with per-record bookkeeping
#[derive(Debug)]
pub struct ParseOutcome {
    /// The graph built from every usable record
    pub graph: KnowledgeGraph,
    /// Number of records that produced an edge
    pub records_applied: usize,
    /// Records that were dropped
    pub skipped: Vec<SkippedRecord>,
}

impl ParseOutcome {
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Parser converting raw model output into a knowledge graph
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    policy: IncompleteRecordPolicy,
}

impl ResponseParser {
    /// Create a parser that skips bad records
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bad-record policy
    pub fn with_policy(mut self, policy: IncompleteRecordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> IncompleteRecordPolicy {
        self.policy
    }

    /// Parse a response into a graph owned by `owner_id`
    pub fn parse(&self, owner_id: &str, raw: &str) -> Result<KnowledgeGraph> {
        self.parse_detailed(owner_id, raw).map(|outcome| outcome.graph)
    }

    /// Parse a response, also reporting which records were dropped
    pub fn parse_detailed(&self, owner_id: &str, raw: &str) -> Result<ParseOutcome> {
        let mut outcome = ParseOutcome {
            graph: KnowledgeGraph::new(owner_id),
            records_applied: 0,
            skipped: Vec::new(),
        };
        let mut pending: Option<PendingRecord> = None;
        let mut last_line = 0;

        let lines = raw
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        for (line_no, line) in lines {
            last_line = line_no;

            if line == OPEN_RECORD {
                if let Some(abandoned) = pending.take() {
                    debug!(
                        line = line_no,
                        abandoned_at = abandoned.start_line,
                        "Discarding record that was never closed"
                    );
                }
                pending = Some(PendingRecord::new(line_no));
            } else if line == CLOSE_RECORD {
                if let Some(record) = pending.take() {
                    self.finalize(record, line_no, &mut outcome)?;
                }
            } else if line.starts_with('"') {
                let Some((key, value)) = split_key_value(line) else {
                    continue;
                };
                let Some(field) = RecordField::parse(key) else {
                    debug!(line = line_no, key, "Ignoring unknown record key");
                    continue;
                };
                match pending.as_mut() {
                    Some(record) => record.assign(field, value, line_no),
                    None => debug!(line = line_no, key, "Ignoring field outside of a record"),
                }
            }
        }

        if let Some(record) = pending.take() {
            self.finalize(record, last_line, &mut outcome)?;
        }

        info!(
            owner_id,
            node_count = outcome.graph.node_count(),
            edge_count = outcome.graph.edge_count(),
            skipped = outcome.skipped.len(),
            "Parsed model response"
        );

        Ok(outcome)
    }

    /// Close a record, applying it to the graph or handling its failure
    fn finalize(
        &self,
        record: PendingRecord,
        end_line: usize,
        outcome: &mut ParseOutcome,
    ) -> Result<()> {
        let start_line = record.start_line;

        match record
            .finish(end_line)
            .and_then(|completed| apply(&mut outcome.graph, completed))
        {
            Ok(()) => {
                outcome.records_applied += 1;
                Ok(())
            }
            Err(error) if error.is_record_error() && self.policy == IncompleteRecordPolicy::Skip => {
                warn!(start_line, end_line, error = %error, "Skipping unusable record");
                outcome.skipped.push(SkippedRecord { start_line, error });
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}

/// Add a validated record's nodes and edge to the graph
fn apply(graph: &mut KnowledgeGraph, record: CompletedRecord) -> Result<()> {
    let source = graph.get_or_insert_node(&record.node_1, record.importance_1)?;
    let target = graph.get_or_insert_node(&record.node_2, record.importance_2)?;
    graph.add_edge(&source, &target, record.edge.as_str())?;

    debug!(
        source = %record.node_1,
        target = %record.node_2,
        edge = %record.edge,
        "Record applied"
    );
    Ok(())
}

/// Split a `"key": value,` line into an unquoted key and value
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim().trim_matches('"');
    let value = value.trim().trim_matches(',').trim().trim_matches('"');
    Some((key, value))
}
