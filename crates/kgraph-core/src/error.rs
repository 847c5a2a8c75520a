//! Error types for kgraph

use thiserror::Error;

/// Result type alias using kgraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// kgraph error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Graph construction errors (E001-E099)
    #[error("Node importance {0} is out of range. Valid range: [0, 3].")]
    InvalidImportance(i32),

    #[error("Incomplete record ending at line {line}: missing '{field}'.")]
    IncompleteRecord { line: usize, field: &'static str },

    #[error("Invalid numeric value '{value}' for '{field}' at line {line}.")]
    NumericFormat {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Node '{0}' does not exist in the graph.")]
    UnknownNode(String),

    // Extraction errors (E100-E199)
    #[error("Language model error: {0}")]
    LanguageModel(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidImportance(_) => "E001",
            Self::IncompleteRecord { .. } => "E002",
            Self::NumericFormat { .. } => "E003",
            Self::UnknownNode(_) => "E004",
            Self::LanguageModel(_) => "E100",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::IncompleteRecord { .. } | Self::NumericFormat { .. } => Some(
                "kgraph config set parser.incomplete_records skip".to_string(),
            ),
            Self::ConfigError(_) => Some("kgraph config reset".to_string()),
            _ => None,
        }
    }

    /// Whether this error invalidates a single parsed record rather than the
    /// whole operation.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidImportance(_) | Self::IncompleteRecord { .. } | Self::NumericFormat { .. }
        )
    }
}
