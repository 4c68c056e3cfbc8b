//! Error types for path parsing and document navigation.

use thiserror::Error;

/// Errors that can occur while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YamlPathError {
    /// Unexpected token at a specific position.
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    /// Invalid syntax with description.
    #[error("Invalid path syntax: {message}")]
    InvalidSyntax { message: String },
}

/// Why a segment could not be applied to a node.
///
/// These are expected outcomes while a document is being edited, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no key '{key}'")]
    NoSuchKey { key: String },
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("cannot look up key '{key}' in {found}")]
    NotAMap { key: String, found: String },
    #[error("cannot index {found}")]
    NotASequence { found: String },
}
