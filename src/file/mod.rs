//! File I/O for YAML documents and schema definitions.

pub mod loader;
