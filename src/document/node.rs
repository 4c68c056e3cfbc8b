//! YAML node representation.
//!
//! A parsed YAML document is a tree of `YamlNode`s. Mappings keep their keys
//! in document order, which is the order diagnostics and navigation results
//! are reported in.
//!
//! # Example
//!
//! ```
//! use yschema::document::node::{YamlNode, YamlValue, YamlNumber};
//! use indexmap::IndexMap;
//!
//! let mut server = IndexMap::new();
//! server.insert("port".to_string(), YamlNode::new(YamlValue::Number(YamlNumber::Integer(8080))));
//! let root = YamlNode::new(YamlValue::Object(server));
//!
//! assert!(root.value().is_object());
//! assert_eq!(root.value().kind_name(), "mapping");
//! ```

use indexmap::IndexMap;

/// Represents YAML numbers (integer or float)
#[derive(Debug, Clone, PartialEq)]
pub enum YamlNumber {
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for YamlNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YamlNumber::Integer(i) => write!(f, "{}", i),
            // whole floats keep their fraction: `8080.0`, not `8080`
            YamlNumber::Float(fl) if fl.is_finite() && fl.fract() == 0.0 => write!(f, "{:.1}", fl),
            YamlNumber::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl YamlNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            YamlNumber::Integer(i) => *i as f64,
            YamlNumber::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, YamlNumber::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, YamlNumber::Float(_))
    }
}

/// A YAML value.
///
/// Objects and arrays contain `YamlNode` instances so that every position in
/// the tree can be handed out by reference during navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    /// A YAML mapping with string keys, in document order
    Object(IndexMap<String, YamlNode>),
    /// A YAML sequence
    Array(Vec<YamlNode>),
    /// A YAML string
    String(String),
    /// A YAML number (integer or float)
    Number(YamlNumber),
    /// A YAML boolean
    Boolean(bool),
    /// A YAML null value
    Null,
    /// A multi-document YAML stream (each document is a YamlNode)
    MultiDoc(Vec<YamlNode>),
}

impl YamlValue {
    pub fn is_object(&self) -> bool {
        matches!(self, YamlValue::Object(_))
    }

    /// Returns true for sequences and multi-document streams.
    pub fn is_sequence(&self) -> bool {
        matches!(self, YamlValue::Array(_) | YamlValue::MultiDoc(_))
    }

    /// Returns true for values without children.
    pub fn is_scalar(&self) -> bool {
        !self.is_object() && !self.is_sequence()
    }

    /// Returns a short name for the kind of value, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            YamlValue::Object(_) => "mapping",
            YamlValue::Array(_) => "sequence",
            YamlValue::String(_) => "string",
            YamlValue::Number(_) => "number",
            YamlValue::Boolean(_) => "boolean",
            YamlValue::Null => "null",
            YamlValue::MultiDoc(_) => "document stream",
        }
    }

    /// Returns the scalar rendered as it would appear in the document, or
    /// `None` for mappings and sequences.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::Boolean(b) => Some(b.to_string()),
            YamlValue::Null => Some("null".to_string()),
            _ => None,
        }
    }
}

/// A node in a parsed YAML document.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub(crate) value: YamlValue,
}

impl YamlNode {
    /// Creates a new node wrapping the given value.
    pub fn new(value: YamlValue) -> Self {
        Self { value }
    }

    /// Returns an immutable reference to the node's value.
    ///
    /// # Example
    ///
    /// ```
    /// use yschema::document::node::{YamlNode, YamlValue};
    ///
    /// let node = YamlNode::new(YamlValue::Boolean(true));
    /// assert!(matches!(node.value(), YamlValue::Boolean(true)));
    /// ```
    pub fn value(&self) -> &YamlValue {
        &self.value
    }

    /// Returns the child stored under `key`, if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        match &self.value {
            YamlValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the number of immediate children.
    pub fn child_count(&self) -> usize {
        match &self.value {
            YamlValue::Object(map) => map.len(),
            YamlValue::Array(items) | YamlValue::MultiDoc(items) => items.len(),
            _ => 0,
        }
    }

    /// Converts the subtree into a `serde_yaml::Value`, e.g. for printing.
    ///
    /// A multi-document stream becomes a sequence of its documents.
    pub fn to_serde_value(&self) -> serde_yaml::Value {
        match &self.value {
            YamlValue::Object(entries) => {
                let map: serde_yaml::Mapping = entries
                    .iter()
                    .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.to_serde_value()))
                    .collect();
                serde_yaml::Value::Mapping(map)
            }
            YamlValue::Array(elements) | YamlValue::MultiDoc(elements) => {
                serde_yaml::Value::Sequence(elements.iter().map(YamlNode::to_serde_value).collect())
            }
            YamlValue::String(s) => serde_yaml::Value::String(s.clone()),
            YamlValue::Number(YamlNumber::Integer(i)) => {
                serde_yaml::Value::Number(serde_yaml::Number::from(*i))
            }
            YamlValue::Number(YamlNumber::Float(f)) => {
                serde_yaml::Value::Number(serde_yaml::Number::from(*f))
            }
            YamlValue::Boolean(b) => serde_yaml::Value::Bool(*b),
            YamlValue::Null => serde_yaml::Value::Null,
        }
    }
}

impl From<YamlValue> for YamlNode {
    fn from(value: YamlValue) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_number_display() {
        let int = YamlNumber::Integer(42);
        assert_eq!(format!("{}", int), "42");

        let float = YamlNumber::Float(42.5);
        assert_eq!(format!("{}", float), "42.5");

        let whole = YamlNumber::Float(8080.0);
        assert_eq!(format!("{}", whole), "8080.0");
    }

    #[test]
    fn test_yaml_number_type_checks() {
        let int = YamlNumber::Integer(42);
        assert!(int.is_integer());
        assert!(!int.is_float());

        let float = YamlNumber::Float(42.0);
        assert!(float.is_float());
        assert!(!float.is_integer());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(YamlValue::Object(IndexMap::new()).is_object());
        assert!(YamlValue::Array(vec![]).is_sequence());
        assert!(YamlValue::MultiDoc(vec![]).is_sequence());
        assert!(YamlValue::Null.is_scalar());
        assert!(YamlValue::String("x".to_string()).is_scalar());
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(
            YamlValue::Number(YamlNumber::Integer(7)).scalar_text(),
            Some("7".to_string())
        );
        assert_eq!(YamlValue::Boolean(false).scalar_text(), Some("false".to_string()));
        assert_eq!(YamlValue::Array(vec![]).scalar_text(), None);
    }

    #[test]
    fn test_get_and_child_count() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), YamlNode::new(YamlValue::Null));
        let node = YamlNode::new(YamlValue::Object(map));
        assert!(node.get("a").is_some());
        assert!(node.get("b").is_none());
        assert_eq!(node.child_count(), 1);
        assert_eq!(YamlNode::new(YamlValue::Null).child_count(), 0);
    }

    #[test]
    fn test_to_serde_value() {
        let mut map = IndexMap::new();
        map.insert(
            "port".to_string(),
            YamlNode::new(YamlValue::Number(YamlNumber::Integer(8080))),
        );
        map.insert(
            "tags".to_string(),
            YamlNode::new(YamlValue::Array(vec![YamlNode::new(YamlValue::String(
                "a".to_string(),
            ))])),
        );
        let value = YamlNode::new(YamlValue::Object(map)).to_serde_value();
        assert_eq!(value["port"], serde_yaml::Value::from(8080));
        assert_eq!(value["tags"][0], serde_yaml::Value::from("a"));
    }
}
