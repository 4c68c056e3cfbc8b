//! Schema types, their registry, and type-aware path resolution.

pub mod error;
pub mod loader;
pub mod node;
pub mod types;
pub mod util;

pub use error::{ResolveError, ResolveErrorKind, SchemaError};
pub use loader::{parse_schema, parse_type_expr, SchemaFile};
pub use node::SchemaNode;
pub use types::{
    Deprecation, SchemaBuilder, SchemaRegistry, TypeDescriptor, TypeId, TypeKind, TypedProperty,
    UNKNOWN_TYPE_NAME,
};
pub use util::TypeUtil;
