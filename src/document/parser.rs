//! YAML parsing into `YamlNode` trees.
//!
//! Parsing is delegated to `yaml-rust2`; this module converts its `Yaml`
//! values into our node representation. A stream containing more than one
//! document becomes a `YamlValue::MultiDoc` root.
//!
//! # Example
//!
//! ```
//! use yschema::document::parser::parse_yaml;
//! use yschema::document::node::YamlValue;
//!
//! let node = parse_yaml("server:\n  port: 8080\n").unwrap();
//! assert!(node.value().is_object());
//! ```

use super::node::{YamlNode, YamlNumber, YamlValue};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use yaml_rust2::{Yaml, YamlLoader};

/// Parses a YAML string into a `YamlNode`.
///
/// An empty stream yields a `Null` node.
///
/// # Errors
///
/// Returns an error if the input is not well-formed YAML.
pub fn parse_yaml(yaml_str: &str) -> Result<YamlNode> {
    let docs = YamlLoader::load_from_str(yaml_str).context("Failed to parse YAML")?;
    debug!("parsed {} YAML document(s)", docs.len());

    let mut nodes: Vec<YamlNode> = docs.iter().map(convert_yaml).collect();
    let root = match nodes.len() {
        0 => YamlNode::new(YamlValue::Null),
        1 => nodes.remove(0),
        _ => YamlNode::new(YamlValue::MultiDoc(nodes)),
    };
    Ok(root)
}

/// Converts a `yaml_rust2::Yaml` value into a `YamlNode`.
pub fn convert_yaml(yaml: &Yaml) -> YamlNode {
    let value = match yaml {
        Yaml::Hash(hash) => {
            let mut entries = IndexMap::with_capacity(hash.len());
            for (key, value) in hash.iter() {
                match key_text(key) {
                    Some(key) => {
                        entries.insert(key, convert_yaml(value));
                    }
                    None => warn!("skipping mapping entry with non-scalar key"),
                }
            }
            YamlValue::Object(entries)
        }
        Yaml::Array(items) => YamlValue::Array(items.iter().map(convert_yaml).collect()),
        Yaml::String(s) => YamlValue::String(s.clone()),
        Yaml::Integer(i) => YamlValue::Number(YamlNumber::Integer(*i)),
        Yaml::Real(text) => match yaml.as_f64() {
            Some(f) => YamlValue::Number(YamlNumber::Float(f)),
            None => YamlValue::String(text.clone()),
        },
        Yaml::Boolean(b) => YamlValue::Boolean(*b),
        Yaml::Null => YamlValue::Null,
        other => {
            warn!("unsupported YAML value {:?}, treating as null", other);
            YamlValue::Null
        }
    };
    YamlNode::new(value)
}

/// Renders a scalar mapping key as text.
fn key_text(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        _ => None,
    }
}
