//! Path types for addressing into schema-typed YAML documents.

use std::fmt;

/// A single step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named key (`.property` or `['property']`)
    Key(String),
    /// Sequence index (`[0]`, `[-1]`)
    Index(isize),
    /// Every immediate child (`*` or `[*]`)
    Wildcard,
}

impl PathSegment {
    /// Creates a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Returns true if this segment can be applied to a map-kind node.
    pub fn applies_to_map(&self) -> bool {
        matches!(self, PathSegment::Key(_) | PathSegment::Wildcard)
    }

    /// Returns true if this segment can be applied to a sequence-kind node.
    pub fn applies_to_sequence(&self) -> bool {
        matches!(self, PathSegment::Index(_) | PathSegment::Wildcard)
    }
}

/// An ordered, immutable sequence of path segments.
///
/// Paths are always relative to the node they are applied to; a leading `$`
/// in the textual form is accepted by the parser but does not become a
/// segment. The empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct YamlPath {
    segments: Vec<PathSegment>,
}

impl YamlPath {
    /// Creates a new path with the given segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with `segment` appended.
    ///
    /// # Example
    ///
    /// ```
    /// use yschema::yamlpath::{PathSegment, YamlPath};
    ///
    /// let path = YamlPath::root()
    ///     .append(PathSegment::key("servers"))
    ///     .append(PathSegment::Index(0));
    /// assert_eq!(path.to_string(), "servers[0]");
    /// ```
    pub fn append(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns the path without its last segment (the empty path stays empty).
    pub fn parent(&self) -> Self {
        let end = self.segments.len().saturating_sub(1);
        self.prefix(end)
    }

    /// Returns the first `n` segments as a new path.
    pub fn prefix(&self, n: usize) -> Self {
        let n = n.min(self.segments.len());
        Self::new(self.segments[..n].to_vec())
    }

    /// Returns the path without its first segment.
    pub fn tail(&self) -> Self {
        match self.segments.split_first() {
            Some((_, rest)) => Self::new(rest.to_vec()),
            None => Self::root(),
        }
    }
}

impl From<Vec<PathSegment>> for YamlPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::new(segments)
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) if is_plain_key(key) => write!(f, "{}", key),
            PathSegment::Key(key) => {
                write!(f, "['{}']", key.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
            PathSegment::Wildcard => write!(f, "[*]"),
        }
    }
}

/// Formats the path in property notation: `server.port`, `servers[0].host`.
impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            let dotted = i > 0 && matches!(segment, PathSegment::Key(k) if is_plain_key(k));
            if dotted {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> YamlPath {
        YamlPath::new(vec![
            PathSegment::key("servers"),
            PathSegment::Index(1),
            PathSegment::key("host"),
        ])
    }

    #[test]
    fn test_display_property_notation() {
        assert_eq!(sample().to_string(), "servers[1].host");
        let path = YamlPath::new(vec![PathSegment::key("logging.level"), PathSegment::Wildcard]);
        assert_eq!(path.to_string(), "['logging.level'][*]");
        assert_eq!(YamlPath::root().to_string(), "");
    }

    #[test]
    fn test_parent_and_prefix() {
        let path = sample();
        assert_eq!(path.parent().len(), 2);
        assert_eq!(path.prefix(1).to_string(), "servers");
        assert_eq!(path.prefix(10), path);
        assert_eq!(YamlPath::root().parent(), YamlPath::root());
    }

    #[test]
    fn test_tail() {
        assert_eq!(sample().tail().to_string(), "[1].host");
        assert!(YamlPath::root().tail().is_empty());
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let base = YamlPath::root().append(PathSegment::key("server"));
        let longer = base.append(PathSegment::key("port"));
        assert_eq!(base.len(), 1);
        assert_eq!(longer.len(), 2);
        assert_eq!(longer.last(), Some(&PathSegment::key("port")));
    }

    #[test]
    fn test_segment_applicability() {
        assert!(PathSegment::key("a").applies_to_map());
        assert!(!PathSegment::key("a").applies_to_sequence());
        assert!(PathSegment::Index(0).applies_to_sequence());
        assert!(!PathSegment::Index(0).applies_to_map());
        assert!(PathSegment::Wildcard.applies_to_map());
        assert!(PathSegment::Wildcard.applies_to_sequence());
    }
}
