//! Parsed YAML documents.

pub mod node;
pub mod parser;

pub use node::{YamlNode, YamlNumber, YamlValue};
pub use parser::parse_yaml;
