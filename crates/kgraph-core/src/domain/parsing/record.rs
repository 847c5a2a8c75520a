//! Record accumulator for the response parser
//!
//! A record is filled field by field while the parser walks the lines of one
//! `{ ... },` block, then validated as a whole when the block closes.

use crate::domain::graph::{MAX_IMPORTANCE, MIN_IMPORTANCE};
use crate::error::{Error, Result};

/// Fields recognized inside a record block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordField {
    Node1,
    Importance1,
    Node2,
    Importance2,
    Edge,
}

impl RecordField {
    pub(crate) fn parse(key: &str) -> Option<Self> {
        match key {
            "node_1" => Some(Self::Node1),
            "importance_1" => Some(Self::Importance1),
            "node_2" => Some(Self::Node2),
            "importance_2" => Some(Self::Importance2),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Node1 => "node_1",
            Self::Importance1 => "importance_1",
            Self::Node2 => "node_2",
            Self::Importance2 => "importance_2",
            Self::Edge => "edge",
        }
    }
}

/// A record being filled in
#[derive(Debug, Default)]
pub(crate) struct PendingRecord {
    /// Line of the opening brace
    pub(crate) start_line: usize,
    node_1: Option<String>,
    importance_1: i32,
    node_2: Option<String>,
    importance_2: i32,
    edge: Option<String>,
    /// First field-level failure, reported when the record closes
    error: Option<Error>,
}

/// A record with every required field present and valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompletedRecord {
    pub(crate) node_1: String,
    pub(crate) importance_1: i32,
    pub(crate) node_2: String,
    pub(crate) importance_2: i32,
    pub(crate) edge: String,
}

impl PendingRecord {
    pub(crate) fn new(start_line: usize) -> Self {
        Self {
            start_line,
            ..Self::default()
        }
    }

    /// Assign a raw value to a field. Missing importances default to 0.
    pub(crate) fn assign(&mut self, field: RecordField, value: &str, line: usize) {
        match field {
            RecordField::Node1 => self.node_1 = non_empty(value),
            RecordField::Node2 => self.node_2 = non_empty(value),
            RecordField::Edge => self.edge = Some(value.to_string()),
            RecordField::Importance1 => {
                if let Some(v) = self.parse_importance(field, value, line) {
                    self.importance_1 = v;
                }
            }
            RecordField::Importance2 => {
                if let Some(v) = self.parse_importance(field, value, line) {
                    self.importance_2 = v;
                }
            }
        }
    }

    /// Validate the accumulated fields
    ///
    /// `end_line` is the line that closed the record and is used in error
    /// messages.
    pub(crate) fn finish(self, end_line: usize) -> Result<CompletedRecord> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let node_1 = self.node_1.ok_or(Error::IncompleteRecord {
            line: end_line,
            field: RecordField::Node1.as_str(),
        })?;
        let node_2 = self.node_2.ok_or(Error::IncompleteRecord {
            line: end_line,
            field: RecordField::Node2.as_str(),
        })?;
        let edge = self.edge.ok_or(Error::IncompleteRecord {
            line: end_line,
            field: RecordField::Edge.as_str(),
        })?;

        for importance in [self.importance_1, self.importance_2] {
            if !(MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&importance) {
                return Err(Error::InvalidImportance(importance));
            }
        }

        Ok(CompletedRecord {
            node_1,
            importance_1: self.importance_1,
            node_2,
            importance_2: self.importance_2,
            edge,
        })
    }

    fn parse_importance(&mut self, field: RecordField, value: &str, line: usize) -> Option<i32> {
        match value.parse::<i32>() {
            Ok(v) => Some(v),
            Err(_) => {
                if self.error.is_none() {
                    self.error = Some(Error::NumericFormat {
                        line,
                        field: field.as_str().to_string(),
                        value: value.to_string(),
                    });
                }
                None
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> PendingRecord {
        let mut record = PendingRecord::new(1);
        record.assign(RecordField::Node1, "Photosynthesis", 2);
        record.assign(RecordField::Importance1, "3", 3);
        record.assign(RecordField::Node2, "Chlorophyll", 4);
        record.assign(RecordField::Importance2, "2", 5);
        record.assign(RecordField::Edge, "requires", 6);
        record
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(RecordField::parse("node_1"), Some(RecordField::Node1));
        assert_eq!(RecordField::parse("edge"), Some(RecordField::Edge));
        assert_eq!(RecordField::parse("weight"), None);
        assert_eq!(RecordField::Importance2.as_str(), "importance_2");
    }

    #[test]
    fn test_complete_record() {
        let record = filled().finish(7).unwrap();

        assert_eq!(record.node_1, "Photosynthesis");
        assert_eq!(record.importance_1, 3);
        assert_eq!(record.node_2, "Chlorophyll");
        assert_eq!(record.importance_2, 2);
        assert_eq!(record.edge, "requires");
    }

    #[test]
    fn test_missing_fields() {
        let mut record = PendingRecord::new(1);
        record.assign(RecordField::Node1, "a", 2);
        record.assign(RecordField::Edge, "rel", 3);

        assert!(matches!(
            record.finish(4),
            Err(Error::IncompleteRecord { line: 4, field: "node_2" })
        ));
    }

    #[test]
    fn test_empty_label_counts_as_missing() {
        let mut record = filled();
        record.assign(RecordField::Node1, "", 8);

        assert!(matches!(
            record.finish(9),
            Err(Error::IncompleteRecord { field: "node_1", .. })
        ));
    }

    #[test]
    fn test_empty_edge_label_allowed() {
        let mut record = filled();
        record.assign(RecordField::Edge, "", 8);
        assert_eq!(record.finish(9).unwrap().edge, "");
    }

    #[test]
    fn test_importance_defaults_to_zero() {
        let mut record = PendingRecord::new(1);
        record.assign(RecordField::Node1, "a", 2);
        record.assign(RecordField::Node2, "b", 3);
        record.assign(RecordField::Edge, "rel", 4);

        let record = record.finish(5).unwrap();
        assert_eq!(record.importance_1, 0);
        assert_eq!(record.importance_2, 0);
    }

    #[test]
    fn test_numeric_format_error() {
        let mut record = filled();
        record.assign(RecordField::Importance2, "high", 8);

        match record.finish(9) {
            Err(Error::NumericFormat { line, field, value }) => {
                assert_eq!(line, 8);
                assert_eq!(field, "importance_2");
                assert_eq!(value, "high");
            }
            other => panic!("expected numeric format error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_importance() {
        let mut record = filled();
        record.assign(RecordField::Importance1, "4", 8);
        assert!(matches!(record.finish(9), Err(Error::InvalidImportance(4))));

        let mut record = filled();
        record.assign(RecordField::Importance2, "-1", 8);
        assert!(matches!(record.finish(9), Err(Error::InvalidImportance(-1))));
    }
}
