//! yschema - schema-driven type classification and path navigation for YAML
//! configuration documents.
//!
//! The crate answers the questions a configuration editor asks while the user
//! types: which type is expected at `server.port`, which properties can follow
//! `server.`, and does the document match its schema.
//!
//! - [`schema`] holds the type registry and the [`schema::TypeUtil`] queries
//! - [`yamlpath`] holds paths, the path parser and the [`yamlpath::Navigable`]
//!   capability
//! - [`document`] and [`file`] load YAML documents
//! - [`check`] and [`assist`] are the validation and completion consumers

pub mod assist;
pub mod check;
pub mod config;
pub mod document;
pub mod file;
pub mod schema;
pub mod yamlpath;
