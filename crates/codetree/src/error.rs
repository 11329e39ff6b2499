//! Error types for codetree operations.

use std::io;
use thiserror::Error;

/// The error type for codetree operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A line is indented deeper than its block allows, or its dedent target
    /// does not exist.
    #[error("line {line}: malformed indentation: {content:?}")]
    MalformedIndentation {
        /// The 1-based line number where the offending span starts.
        line: usize,
        /// The offending text, indentation stripped.
        content: String,
    },

    /// IO error occurred while reading a source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// One or more sources failed during a multi-file parse.
    #[error("{} source(s) failed: {}", messages.len(), messages.join("; "))]
    Aggregate {
        /// One message per failed source, prefixed with the source name.
        messages: Vec<String>,
    },

    /// Invalid parser configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the line number for errors tied to a position in the source.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedIndentation { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A specialized Result type for codetree operations.
pub type Result<T> = std::result::Result<T, Error>;
