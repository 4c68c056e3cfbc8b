//! Validation of YAML documents against a schema.
//!
//! [`validate`] walks a document together with the type expected at each
//! position and reports every mismatch as a [`Diagnostic`]. Nothing here
//! fails: an unparseable or half-typed document simply yields diagnostics.
//!
//! # Example
//!
//! ```
//! use yschema::check::{validate, CheckOptions};
//! use yschema::document::parse_yaml;
//! use yschema::schema::parse_schema;
//!
//! let registry = parse_schema(
//!     "root: Config\ntypes:\n  Config:\n    properties:\n      port: Integer\n",
//! ).unwrap();
//! let doc = parse_yaml("port: eighty\nhost: x\n").unwrap();
//!
//! let diagnostics = validate(&registry, registry.root().unwrap(), &doc, &CheckOptions::default());
//! assert_eq!(diagnostics.len(), 2);
//! ```

use std::fmt;

use log::debug;

use crate::config::Config;
use crate::document::node::{YamlNode, YamlNumber, YamlValue};
use crate::schema::{SchemaRegistry, TypeId, TypeUtil};
use crate::yamlpath::{Parser, PathSegment, YamlPath};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What is wrong at a document position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    UnknownProperty {
        property: String,
        type_name: String,
    },
    Deprecated {
        property: String,
        replacement: Option<String>,
    },
    ExpectedMap {
        type_name: String,
        found: String,
    },
    ExpectedSequence {
        type_name: String,
        found: String,
    },
    ExpectedScalar {
        type_name: String,
        found: String,
    },
    InvalidValue {
        value: String,
        type_name: String,
    },
}

impl Problem {
    pub fn severity(&self) -> Severity {
        match self {
            Problem::Deprecated { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::UnknownProperty {
                property,
                type_name,
            } => write!(f, "Unknown property '{}' for type {}", property, type_name),
            Problem::Deprecated {
                property,
                replacement: Some(replacement),
            } => write!(
                f,
                "Property '{}' is deprecated, use '{}' instead",
                property, replacement
            ),
            Problem::Deprecated { property, .. } => {
                write!(f, "Property '{}' is deprecated", property)
            }
            Problem::ExpectedMap { type_name, found }
            | Problem::ExpectedSequence { type_name, found }
            | Problem::ExpectedScalar { type_name, found } => {
                write!(f, "Expected {} but found a {}", type_name, found)
            }
            Problem::InvalidValue { value, type_name } => {
                write!(f, "'{}' is not a valid {}", value, type_name)
            }
        }
    }
}

/// A problem together with the path it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: YamlPath,
    pub problem: Problem,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.problem.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.to_string()
        };
        write!(f, "{}: {}: {}", self.severity(), path, self.problem)
    }
}

/// Validation switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub report_deprecated: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            report_deprecated: true,
        }
    }
}

impl From<&Config> for CheckOptions {
    fn from(config: &Config) -> Self {
        Self {
            report_deprecated: config.report_deprecated,
        }
    }
}

/// Validates `doc` against `root`, returning diagnostics in document order.
///
/// A multi-document stream is validated document by document, each against
/// `root`. Null values are accepted everywhere, and positions whose type is
/// unknown are not descended into.
pub fn validate(
    registry: &SchemaRegistry,
    root: TypeId,
    doc: &YamlNode,
    options: &CheckOptions,
) -> Vec<Diagnostic> {
    let mut checker = Checker {
        registry,
        options,
        diagnostics: Vec::new(),
    };

    match doc.value() {
        YamlValue::MultiDoc(docs) => {
            for (idx, node) in docs.iter().enumerate() {
                checker.walk(root, node, &YamlPath::root().append(PathSegment::Index(idx as isize)));
            }
        }
        _ => checker.walk(root, doc, &YamlPath::root()),
    }

    debug!("validation produced {} diagnostic(s)", checker.diagnostics.len());
    checker.diagnostics
}

struct Checker<'a> {
    registry: &'a SchemaRegistry,
    options: &'a CheckOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Checker<'_> {
    fn report(&mut self, path: &YamlPath, problem: Problem) {
        self.diagnostics.push(Diagnostic {
            path: path.clone(),
            problem,
        });
    }

    fn walk(&mut self, ty: TypeId, node: &YamlNode, path: &YamlPath) {
        let registry = self.registry;
        if registry.is_unknown(ty) || matches!(node.value(), YamlValue::Null) {
            return;
        }

        if registry.is_atomic(ty) {
            self.check_scalar(ty, node, path);
        } else if registry.is_sequencable(ty) {
            self.check_sequence(ty, node, path);
        } else if registry.is_map(ty) {
            self.check_map(ty, node, path);
        }
    }

    fn check_map(&mut self, ty: TypeId, node: &YamlNode, path: &YamlPath) {
        let registry = self.registry;
        let YamlValue::Object(entries) = node.value() else {
            self.report(
                path,
                Problem::ExpectedMap {
                    type_name: registry.nice_type_name(ty),
                    found: node.value().kind_name().to_string(),
                },
            );
            return;
        };

        let properties = registry.get_properties_map(ty);
        for (key, child) in entries {
            let child_path = path.append(PathSegment::Key(key.clone()));
            if let Some(property) = properties.get(key) {
                if let (true, Some(deprecation)) =
                    (self.options.report_deprecated, &property.deprecation)
                {
                    self.report(
                        &child_path,
                        Problem::Deprecated {
                            property: key.clone(),
                            replacement: deprecation.replacement.clone(),
                        },
                    );
                }
                self.walk(property.ty, child, &child_path);
            } else if registry.is_open_map(ty) {
                self.walk(registry.get_domain_type(ty), child, &child_path);
            } else if let Some(target) = self.resolve_dotted(ty, key) {
                self.walk(target, child, &child_path);
            } else {
                self.report(
                    &child_path,
                    Problem::UnknownProperty {
                        property: key.clone(),
                        type_name: registry.nice_type_name(ty),
                    },
                );
            }
        }
    }

    /// Resolves a flattened key such as `logging.level.root` written in one
    /// line.
    ///
    /// The longest declared property that is a dotted prefix of the key wins,
    /// so a property named `logging.level` is found before the key is split
    /// at every dot.
    fn resolve_dotted(&self, ty: TypeId, key: &str) -> Option<TypeId> {
        if !key.contains('.') {
            return None;
        }
        let properties = self.registry.get_properties_map(ty);
        for (idx, _) in key.rmatch_indices('.') {
            if let Some(property) = properties.get(&key[..idx]) {
                let rest = Parser::parse(&key[idx + 1..]).ok()?;
                return self.registry.resolve(property.ty, &rest).ok();
            }
        }
        let path = Parser::parse(key).ok()?;
        self.registry.resolve(ty, &path).ok()
    }

    fn check_sequence(&mut self, ty: TypeId, node: &YamlNode, path: &YamlPath) {
        let registry = self.registry;
        let element = registry.get_domain_type(ty);
        match node.value() {
            YamlValue::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let item_path = path.append(PathSegment::Index(idx as isize));
                    self.walk(element, item, &item_path);
                }
            }
            // A comma-separated scalar is accepted for a list of scalars.
            YamlValue::String(text) if registry.is_atomic(element) => {
                for (idx, part) in text.split(',').enumerate() {
                    let item = YamlNode::new(YamlValue::String(part.trim().to_string()));
                    let item_path = path.append(PathSegment::Index(idx as isize));
                    self.check_scalar(element, &item, &item_path);
                }
            }
            value if value.is_scalar() && registry.is_atomic(element) => {
                self.check_scalar(element, node, &path.append(PathSegment::Index(0)));
            }
            other => self.report(
                path,
                Problem::ExpectedSequence {
                    type_name: registry.nice_type_name(ty),
                    found: other.kind_name().to_string(),
                },
            ),
        }
    }

    fn check_scalar(&mut self, ty: TypeId, node: &YamlNode, path: &YamlPath) {
        let registry = self.registry;
        let Some(text) = node.value().scalar_text() else {
            self.report(
                path,
                Problem::ExpectedScalar {
                    type_name: registry.nice_type_name(ty),
                    found: node.value().kind_name().to_string(),
                },
            );
            return;
        };

        let hints = registry.get_hint_values(ty);
        let valid = if !hints.is_empty() {
            hints.iter().any(|hint| hint.eq_ignore_ascii_case(&text))
        } else if ty == TypeId::INTEGER {
            match node.value() {
                YamlValue::Number(YamlNumber::Integer(_)) => true,
                YamlValue::Number(YamlNumber::Float(_)) => false,
                _ => text.trim().parse::<i64>().is_ok(),
            }
        } else if ty == TypeId::FLOAT {
            matches!(node.value(), YamlValue::Number(_)) || text.trim().parse::<f64>().is_ok()
        } else {
            true
        };

        if !valid {
            self.report(
                path,
                Problem::InvalidValue {
                    value: text,
                    type_name: registry.nice_type_name(ty),
                },
            );
        }
    }
}
