//! The `Navigable` capability and whole-path traversal.
//!
//! Anything that can resolve one [`PathSegment`] to child nodes implements
//! [`Navigable`]: parsed document nodes (`&YamlNode`) and schema assist
//! nodes ([`SchemaNode`](crate::schema::SchemaNode)). Chaining segments over
//! a full path is done once, here, in [`traverse_from`].

use log::trace;

use super::ast::{PathSegment, YamlPath};
use super::error::NavigationError;
use crate::document::node::{YamlNode, YamlValue};

/// Outcome of applying one segment to one node.
pub type Navigation<N> = Result<Vec<N>, NavigationError>;

/// A node that can resolve a path segment to its children.
///
/// `traverse` must be a pure function of the node and the segment. `Key`
/// and `Index` yield exactly one node on success; `Wildcard` yields every
/// immediate child, which is no nodes at all for a leaf.
pub trait Navigable: Sized {
    fn traverse(&self, segment: &PathSegment) -> Navigation<Self>;
}

/// Where and why a traversal stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalFailure<N> {
    /// The prefix of the path that did resolve.
    pub valid: YamlPath,
    /// The nodes reached by `valid`.
    pub reached: Vec<N>,
    /// Why the next segment failed.
    pub error: NavigationError,
}

/// Applies `segment` to every node in `nodes`.
///
/// Nodes the segment does not apply to are dropped. The step only fails if
/// every node rejected the segment, and then reports the first rejection.
pub fn step<N: Navigable>(nodes: &[N], segment: &PathSegment) -> Navigation<N> {
    let mut reached = Vec::new();
    let mut first_error = None;
    let mut any_ok = false;

    for node in nodes {
        match node.traverse(segment) {
            Ok(children) => {
                any_ok = true;
                reached.extend(children);
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) if !any_ok => Err(err),
        _ => Ok(reached),
    }
}

/// Applies every segment of `path` to `nodes`, short-circuiting on the
/// first segment that fails.
pub fn traverse_from<N: Navigable>(
    nodes: Vec<N>,
    path: &YamlPath,
) -> Result<Vec<N>, TraversalFailure<N>> {
    let mut current = nodes;
    for (depth, segment) in path.segments().iter().enumerate() {
        match step(&current, segment) {
            Ok(next) => current = next,
            Err(error) => {
                trace!("traversal of '{}' failed at depth {}: {}", path, depth, error);
                return Err(TraversalFailure {
                    valid: path.prefix(depth),
                    reached: current,
                    error,
                });
            }
        }
    }
    Ok(current)
}

/// Applies `path` to a single root node.
///
/// # Example
///
/// ```
/// use yschema::document::parse_yaml;
/// use yschema::yamlpath::{traverse_path, Parser};
///
/// let doc = parse_yaml("servers:\n  - host: a\n  - host: b\n").unwrap();
/// let path = Parser::parse("servers[*].host").unwrap();
/// let hosts = traverse_path(&doc, &path).unwrap();
/// assert_eq!(hosts.len(), 2);
/// ```
pub fn traverse_path<N: Navigable>(root: N, path: &YamlPath) -> Result<Vec<N>, TraversalFailure<N>> {
    traverse_from(vec![root], path)
}

fn normalize_index(index: isize, len: usize) -> Option<usize> {
    let normalized = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if normalized >= 0 && (normalized as usize) < len {
        Some(normalized as usize)
    } else {
        None
    }
}

/// The error for a segment that does not apply to a node, where `found`
/// describes the node.
pub(crate) fn mismatch(segment: &PathSegment, found: String) -> NavigationError {
    match segment {
        PathSegment::Key(key) => NavigationError::NotAMap {
            key: key.clone(),
            found,
        },
        _ => NavigationError::NotASequence { found },
    }
}

impl<'a> Navigable for &'a YamlNode {
    fn traverse(&self, segment: &PathSegment) -> Navigation<Self> {
        let node: &'a YamlNode = *self;
        let value = node.value();
        let applies = if value.is_object() {
            segment.applies_to_map()
        } else if value.is_sequence() {
            segment.applies_to_sequence()
        } else {
            *segment == PathSegment::Wildcard
        };
        if !applies {
            return Err(mismatch(segment, value.kind_name().to_string()));
        }

        match (segment, value) {
            (PathSegment::Key(key), YamlValue::Object(map)) => match map.get(key) {
                Some(child) => Ok(vec![child]),
                None => Err(NavigationError::NoSuchKey { key: key.clone() }),
            },
            (PathSegment::Index(index), YamlValue::Array(items))
            | (PathSegment::Index(index), YamlValue::MultiDoc(items)) => {
                match normalize_index(*index, items.len()) {
                    Some(idx) => Ok(vec![&items[idx]]),
                    None => Err(NavigationError::IndexOutOfRange {
                        index: *index,
                        len: items.len(),
                    }),
                }
            }
            (PathSegment::Wildcard, YamlValue::Object(map)) => Ok(map.values().collect()),
            (PathSegment::Wildcard, YamlValue::Array(items))
            | (PathSegment::Wildcard, YamlValue::MultiDoc(items)) => Ok(items.iter().collect()),
            // a wildcard on a scalar has no children
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::YamlNumber;
    use indexmap::IndexMap;

    fn make_test_tree() -> YamlNode {
        let items = vec![
            YamlNode::new(YamlValue::String("a".to_string())),
            YamlNode::new(YamlValue::String("b".to_string())),
            YamlNode::new(YamlValue::String("c".to_string())),
        ];

        let mut obj = IndexMap::new();
        obj.insert(
            "name".to_string(),
            YamlNode::new(YamlValue::String("test".to_string())),
        );
        obj.insert(
            "age".to_string(),
            YamlNode::new(YamlValue::Number(YamlNumber::Integer(42))),
        );
        obj.insert("items".to_string(), YamlNode::new(YamlValue::Array(items)));

        YamlNode::new(YamlValue::Object(obj))
    }

    fn path(segments: Vec<PathSegment>) -> YamlPath {
        YamlPath::new(segments)
    }

    #[test]
    fn test_traverse_key() {
        let tree = make_test_tree();
        let results = traverse_path(&tree, &path(vec![PathSegment::key("name")])).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value(), &YamlValue::String("test".to_string()));
    }

    #[test]
    fn test_traverse_index() {
        let tree = make_test_tree();
        let results = traverse_path(
            &tree,
            &path(vec![PathSegment::key("items"), PathSegment::Index(1)]),
        )
        .unwrap();
        assert_eq!(results[0].value(), &YamlValue::String("b".to_string()));
    }

    #[test]
    fn test_traverse_negative_index() {
        let tree = make_test_tree();
        let results = traverse_path(
            &tree,
            &path(vec![PathSegment::key("items"), PathSegment::Index(-1)]),
        )
        .unwrap();
        assert_eq!(results[0].value(), &YamlValue::String("c".to_string()));
    }

    #[test]
    fn test_traverse_wildcard() {
        let tree = make_test_tree();
        let results = traverse_path(&tree, &path(vec![PathSegment::Wildcard])).unwrap();
        assert_eq!(results.len(), 3);

        let leaves = traverse_path(
            &tree,
            &path(vec![PathSegment::key("name"), PathSegment::Wildcard]),
        )
        .unwrap();
        assert!(leaves.is_empty());
    }

    #[test]
    fn test_missing_key_reports_valid_prefix() {
        let tree = make_test_tree();
        let failure = traverse_path(
            &tree,
            &path(vec![PathSegment::key("items"), PathSegment::key("bogus")]),
        )
        .unwrap_err();
        assert_eq!(failure.valid, path(vec![PathSegment::key("items")]));
        assert_eq!(failure.reached.len(), 1);
        assert!(failure.reached[0].value().is_sequence());
        assert_eq!(
            failure.error,
            NavigationError::NotAMap {
                key: "bogus".to_string(),
                found: "sequence".to_string()
            }
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let tree = make_test_tree();
        let failure = traverse_path(
            &tree,
            &path(vec![PathSegment::key("items"), PathSegment::Index(3)]),
        )
        .unwrap_err();
        assert_eq!(
            failure.error,
            NavigationError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_index_into_scalar() {
        let tree = make_test_tree();
        let failure = traverse_path(
            &tree,
            &path(vec![PathSegment::key("age"), PathSegment::Index(0)]),
        )
        .unwrap_err();
        assert_eq!(
            failure.error,
            NavigationError::NotASequence {
                found: "number".to_string()
            }
        );
    }

    #[test]
    fn test_index_into_mapping() {
        let tree = make_test_tree();
        let failure = traverse_path(&tree, &path(vec![PathSegment::Index(0)])).unwrap_err();
        assert!(failure.valid.is_empty());
        assert_eq!(
            failure.error,
            NavigationError::NotASequence {
                found: "mapping".to_string()
            }
        );
    }

    #[test]
    fn test_step_drops_nodes_that_do_not_match() {
        let tree = make_test_tree();
        // The root's children are a string, a number and a sequence.
        let children = step(&[&tree], &PathSegment::Wildcard).unwrap();
        let err = step(&children, &PathSegment::key("x")).unwrap_err();
        assert!(matches!(err, NavigationError::NotAMap { .. }));

        // Index applies to the sequence child only; the scalars are dropped.
        let picked = step(&children, &PathSegment::Index(0)).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].value(), &YamlValue::String("a".to_string()));
    }

    #[test]
    fn test_empty_path_returns_root() {
        let tree = make_test_tree();
        let results = traverse_path(&tree, &YamlPath::root()).unwrap();
        assert_eq!(results.len(), 1);
        assert!(std::ptr::eq(results[0], &tree));
    }
}
