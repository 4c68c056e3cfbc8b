//! Paths into schema-typed YAML documents.
//!
//! A [`YamlPath`] is an ordered list of [`PathSegment`]s. Paths are parsed
//! from text by [`Parser`] and applied to anything [`Navigable`].
//!
//! # Supported Syntax
//!
//! - `$` - Root node (optional)
//! - `.property` or a leading `property` - Named key access
//! - `['property']` - Bracket notation, for keys containing dots
//! - `[index]` - Sequence index (supports negative indices)
//! - `[*]` or `.*` - All children (wildcard)
//!
//! # Examples
//!
//! ```
//! // server.port              - the port of the server
//! // $.servers[0].host        - host of the first server
//! // servers[*].host          - every server's host
//! // $['logging.level'].root  - a key containing dots
//! ```

pub mod ast;
pub mod error;
pub mod navigable;
pub mod parser;

pub use ast::{PathSegment, YamlPath};
pub use error::{NavigationError, YamlPathError};
pub use navigable::{step, traverse_from, traverse_path, Navigable, Navigation, TraversalFailure};
pub use parser::Parser;
