//! Completion proposals for a partially typed path.

use log::debug;

use crate::config::Config;
use crate::schema::{TypeId, TypeUtil};
use crate::yamlpath::YamlPath;

/// What a completion inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// A property name of a bean.
    Property,
    /// A literal value of a restricted atomic type.
    Value,
}

/// A single completion proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
    /// Type of the property, or the type the value belongs to.
    pub type_name: String,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// Completion switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistOptions {
    pub include_deprecated: bool,
    pub max_results: usize,
}

impl Default for AssistOptions {
    fn default() -> Self {
        Self {
            include_deprecated: false,
            max_results: 50,
        }
    }
}

impl From<&Config> for AssistOptions {
    fn from(config: &Config) -> Self {
        Self {
            include_deprecated: config.include_deprecated_completions,
            max_results: config.max_completions,
        }
    }
}

/// Proposes what can be written after `path`, filtered by `prefix`.
///
/// A bean at `path` proposes its property names, a restricted atomic type
/// its hint values. Matching is a case-insensitive prefix match and keeps
/// declaration order. A path that does not resolve proposes nothing.
///
/// # Example
///
/// ```
/// use yschema::assist::{complete, AssistOptions};
/// use yschema::schema::parse_schema;
/// use yschema::yamlpath::Parser;
///
/// let registry = parse_schema(
///     "root: Config\ntypes:\n  Config:\n    properties:\n      server: Server\n  Server:\n    properties:\n      port: Integer\n      path: String\n",
/// ).unwrap();
/// let root = registry.root().unwrap();
///
/// let proposals = complete(&registry, root, &Parser::parse("server").unwrap(), "po", &AssistOptions::default());
/// assert_eq!(proposals.len(), 1);
/// assert_eq!(proposals[0].label, "port");
/// ```
pub fn complete<U: TypeUtil>(
    types: &U,
    root: TypeId,
    path: &YamlPath,
    prefix: &str,
    options: &AssistOptions,
) -> Vec<Completion> {
    let ty = match types.resolve(root, path) {
        Ok(ty) => ty,
        Err(err) => {
            debug!("no completions at '{}': {}", path, err);
            return Vec::new();
        }
    };

    let prefix = prefix.to_lowercase();
    let accept = |label: &str| label.to_lowercase().starts_with(&prefix);

    let proposals: Vec<Completion> = if types.is_atomic(ty) {
        let type_name = types.nice_type_name(ty);
        types
            .get_hint_values(ty)
            .iter()
            .filter(|hint| accept(hint.as_str()))
            .map(|hint| Completion {
                label: hint.clone(),
                kind: CompletionKind::Value,
                type_name: type_name.clone(),
                description: None,
                deprecated: false,
            })
            .collect()
    } else {
        types
            .get_properties(ty)
            .into_iter()
            .filter(|property| options.include_deprecated || !property.is_deprecated())
            .filter(|property| accept(property.name.as_str()))
            .map(|property| Completion {
                label: property.name.clone(),
                kind: CompletionKind::Property,
                type_name: types.nice_type_name(property.ty),
                description: property.description.clone(),
                deprecated: property.is_deprecated(),
            })
            .collect()
    };

    proposals.into_iter().take(options.max_results).collect()
}
