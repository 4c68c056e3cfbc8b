//! Error types for schema construction and type resolution.

use thiserror::Error;

use super::types::TypeId;
use crate::yamlpath::YamlPath;

/// Errors raised while building a schema registry or loading a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("unknown type '{name}' referenced by {referenced_by}")]
    UnknownType { name: String, referenced_by: String },

    #[error("type '{0}' is not a bean and cannot have properties")]
    NotABean(String),

    #[error("property '{property}' is declared more than once on type '{type_name}'")]
    DuplicateProperty { type_name: String, property: String },

    #[error("invalid type expression '{expr}': {message}")]
    InvalidTypeExpression { expr: String, message: String },

    #[error("root type '{0}' is not declared")]
    UnknownRoot(String),
}

/// Why a path could not be resolved against a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveErrorKind {
    #[error("unknown property '{property}' for type {type_name}")]
    UnknownProperty { property: String, type_name: String },

    #[error("cannot descend into atomic type {type_name}")]
    AtomicType { type_name: String },

    #[error("cannot look up a key in non-map type {type_name}")]
    NotAMap { type_name: String },

    #[error("cannot index non-sequence type {type_name}")]
    NotSequencable { type_name: String },

    #[error("cannot navigate into an unknown type")]
    UnknownType,
}

/// A failed resolution: what went wrong, and how far resolution got.
///
/// `resolved` is the longest prefix of the requested path that did resolve
/// and `reached` is the type found there, so callers can report
/// "valid up to here".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at '{resolved}'")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub resolved: YamlPath,
    pub reached: TypeId,
}
