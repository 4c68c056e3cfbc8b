//! Schema definitions written in YAML.
//!
//! ```yaml
//! root: Config
//! types:
//!   Config:
//!     properties:
//!       server: Server
//!       profiles: { type: "List<String>", description: Active profiles }
//!       old-port: { type: Integer, deprecated: { replacement: server.port } }
//!   Server:
//!     properties:
//!       port: Integer
//!   LogLevel:
//!     values: [TRACE, DEBUG, INFO, WARN, ERROR]
//!   Duration:
//!     atomic: true
//! ```
//!
//! A type with `values` is an enumeration, a type with `atomic: true` is an
//! unrestricted scalar, and anything else is a bean. Property types are type
//! expressions: a type name, `List<T>`, `T[]` or `Map<String, T>`.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use super::error::SchemaError;
use super::types::{Deprecation, SchemaBuilder, SchemaRegistry, TypeId, TypedProperty};

/// Top level of a schema definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    /// Name of the type documents start at.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub types: IndexMap<String, TypeDef>,
}

/// Definition of one named type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    #[serde(default)]
    pub description: Option<String>,
    /// Allowed literal values; makes the type an enumeration.
    #[serde(default)]
    pub values: Option<Vec<String>>,
    /// Marks an unrestricted scalar type.
    #[serde(default)]
    pub atomic: bool,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyDef>,
}

/// A property, either as a bare type expression or in full.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertyDef {
    Short(String),
    Full {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        deprecated: Option<DeprecatedDef>,
    },
}

/// `deprecated: true` or `deprecated: { replacement: ..., reason: ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeprecatedDef {
    Flag(bool),
    Details {
        #[serde(default)]
        replacement: Option<String>,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl DeprecatedDef {
    fn into_deprecation(self) -> Option<Deprecation> {
        match self {
            DeprecatedDef::Flag(false) => None,
            DeprecatedDef::Flag(true) => Some(Deprecation::default()),
            DeprecatedDef::Details {
                replacement,
                reason,
            } => Some(Deprecation {
                replacement,
                reason,
            }),
        }
    }
}

impl SchemaFile {
    /// Builds a registry from the definitions.
    ///
    /// All types are declared before any property is resolved, so types may
    /// refer to each other in any order.
    pub fn into_registry(self) -> Result<SchemaRegistry, SchemaError> {
        let mut builder = SchemaBuilder::new();
        let mut beans = Vec::new();

        for (name, def) in &self.types {
            let id = match (&def.values, def.atomic) {
                (Some(values), _) => builder.enumeration(name, values.iter().cloned())?,
                (None, true) => builder.atomic(name)?,
                (None, false) => {
                    let id = builder.declare_bean(name)?;
                    beans.push(id);
                    id
                }
            };
            if let Some(description) = &def.description {
                builder.describe(id, description.clone());
            }
            if !beans.contains(&id) && !def.properties.is_empty() {
                return Err(SchemaError::NotABean(name.clone()));
            }
        }

        for (name, def) in self.types {
            let Some(bean) = builder.lookup(&name) else {
                continue;
            };
            for (prop_name, prop) in def.properties {
                let referenced_by = format!("property '{}' of '{}'", prop_name, name);
                let property = match prop {
                    PropertyDef::Short(expr) => {
                        TypedProperty::new(prop_name, parse_type_expr(&mut builder, &expr, &referenced_by)?)
                    }
                    PropertyDef::Full {
                        ty,
                        description,
                        deprecated,
                    } => {
                        let ty = parse_type_expr(&mut builder, &ty, &referenced_by)?;
                        TypedProperty {
                            name: prop_name,
                            ty,
                            description,
                            deprecation: deprecated.and_then(DeprecatedDef::into_deprecation),
                        }
                    }
                };
                builder.property(bean, property)?;
            }
        }

        let root = match &self.root {
            Some(name) => Some(
                builder
                    .lookup(name)
                    .ok_or_else(|| SchemaError::UnknownRoot(name.clone()))?,
            ),
            None => None,
        };

        let registry = builder.build();
        debug!("built schema registry with {} types", registry.len());
        Ok(match root {
            Some(root) => registry.with_root(root),
            None => registry,
        })
    }
}

/// Parses a schema definition from YAML text.
///
/// # Example
///
/// ```
/// use yschema::schema::{parse_schema, TypeUtil};
///
/// let registry = parse_schema("root: Config\ntypes:\n  Config:\n    properties:\n      port: Integer\n").unwrap();
/// let root = registry.root().unwrap();
/// assert_eq!(registry.get_properties(root)[0].name, "port");
/// ```
pub fn parse_schema(text: &str) -> Result<SchemaRegistry> {
    let file: SchemaFile = serde_yaml::from_str(text).context("Failed to parse schema definition")?;
    let registry = file.into_registry().context("Invalid schema definition")?;
    Ok(registry)
}

/// Resolves a type expression, creating container types as needed.
///
/// Supported forms: `Name`, `List<T>`, `T[]`, `Map<String, T>`.
pub fn parse_type_expr(
    builder: &mut SchemaBuilder,
    expr: &str,
    referenced_by: &str,
) -> Result<TypeId, SchemaError> {
    let trimmed = expr.trim();
    let invalid = |message: &str| SchemaError::InvalidTypeExpression {
        expr: expr.to_string(),
        message: message.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty type"));
    }

    if let Some(inner) = trimmed.strip_suffix("[]") {
        let element = parse_type_expr(builder, inner, referenced_by)?;
        return Ok(builder.sequence_of(element));
    }

    if let Some(args) = generic_args(trimmed, "List") {
        let element = parse_type_expr(builder, args, referenced_by)?;
        return Ok(builder.sequence_of(element));
    }

    if let Some(args) = generic_args(trimmed, "Map") {
        let (key, value) = split_top_level(args).ok_or_else(|| invalid("expected Map<K, V>"))?;
        if key.trim() != "String" {
            return Err(invalid("map keys must be String"));
        }
        let value = parse_type_expr(builder, value, referenced_by)?;
        return Ok(builder.map_of(value));
    }

    if trimmed.contains(&['<', '>', ',', '[', ']'][..]) {
        return Err(invalid("malformed type expression"));
    }

    builder
        .lookup(trimmed)
        .ok_or_else(|| SchemaError::UnknownType {
            name: trimmed.to_string(),
            referenced_by: referenced_by.to_string(),
        })
}

/// Returns the text between `Name<` and the final `>`.
fn generic_args<'e>(expr: &'e str, name: &str) -> Option<&'e str> {
    expr.strip_prefix(name)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Splits `K, V` at the first comma not nested inside angle brackets.
fn split_top_level(args: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, ch) in args.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => return Some((&args[..idx], &args[idx + 1..])),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TypeKind, TypeUtil};

    #[test]
    fn test_type_expressions() {
        let mut builder = SchemaBuilder::new();
        let list = parse_type_expr(&mut builder, "List<String>", "test").unwrap();
        let array = parse_type_expr(&mut builder, "String[]", "test").unwrap();
        assert_eq!(list, array);

        let nested = parse_type_expr(&mut builder, "Map<String, List<Integer>>", "test").unwrap();
        let registry = builder.build();
        assert_eq!(registry.nice_type_name(nested), "Map<String, List<Integer>>");
        assert!(matches!(
            registry.descriptor(nested).kind(),
            TypeKind::Map { .. }
        ));
    }

    #[test]
    fn test_type_expression_errors() {
        let mut builder = SchemaBuilder::new();
        assert!(matches!(
            parse_type_expr(&mut builder, "Map<Integer, String>", "p"),
            Err(SchemaError::InvalidTypeExpression { .. })
        ));
        assert!(matches!(
            parse_type_expr(&mut builder, "List<String", "p"),
            Err(SchemaError::InvalidTypeExpression { .. })
        ));
        assert!(matches!(
            parse_type_expr(&mut builder, "", "p"),
            Err(SchemaError::InvalidTypeExpression { .. })
        ));
        assert_eq!(
            parse_type_expr(&mut builder, "Nope", "property 'x' of 'Y'"),
            Err(SchemaError::UnknownType {
                name: "Nope".to_string(),
                referenced_by: "property 'x' of 'Y'".to_string()
            })
        );
    }

    #[test]
    fn test_forward_references() {
        let text = r#"
root: Config
types:
  Config:
    properties:
      server: Server
  Server:
    properties:
      port: Integer
"#;
        let registry = parse_schema(text).unwrap();
        let server = registry.lookup("Server").unwrap();
        let config = registry.root().unwrap();
        assert_eq!(registry.get_properties_map(config)["server"].ty, server);
    }

    #[test]
    fn test_deprecation_forms() {
        let text = r#"
types:
  Config:
    properties:
      a: { type: String, deprecated: true }
      b: { type: String, deprecated: false }
      c: { type: String, deprecated: { replacement: d, reason: renamed } }
      d: { type: String, description: The new one }
"#;
        let registry = parse_schema(text).unwrap();
        let config = registry.lookup("Config").unwrap();
        let props = registry.get_properties_map(config);
        assert!(props["a"].is_deprecated());
        assert!(!props["b"].is_deprecated());
        let c = props["c"].deprecation.as_ref().unwrap();
        assert_eq!(c.replacement.as_deref(), Some("d"));
        assert_eq!(c.reason.as_deref(), Some("renamed"));
        assert_eq!(props["d"].description.as_deref(), Some("The new one"));
    }

    #[test]
    fn test_enumeration_with_properties_rejected() {
        let text = r#"
types:
  Level:
    values: [A, B]
    properties:
      x: String
"#;
        let file: SchemaFile = serde_yaml::from_str(text).unwrap();
        assert_eq!(
            file.into_registry().unwrap_err(),
            SchemaError::NotABean("Level".to_string())
        );
    }

    #[test]
    fn test_unknown_root_rejected() {
        let file: SchemaFile = serde_yaml::from_str("root: Missing\n").unwrap();
        assert_eq!(
            file.into_registry().unwrap_err(),
            SchemaError::UnknownRoot("Missing".to_string())
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_schema("typez: {}\n").is_err());
    }
}
