//! Schema type descriptors and the registry that owns them.
//!
//! Types are created through a [`SchemaBuilder`] and frozen into a
//! [`SchemaRegistry`]. Code outside this module refers to types through
//! [`TypeId`] handles; a handle is only meaningful for the registry that
//! produced it.
//!
//! # Example
//!
//! ```
//! use yschema::schema::{SchemaBuilder, TypeId, TypedProperty};
//!
//! let mut builder = SchemaBuilder::new();
//! let server = builder.declare_bean("Server").unwrap();
//! builder.property(server, TypedProperty::new("port", TypeId::INTEGER)).unwrap();
//! let registry = builder.build();
//!
//! assert_eq!(registry.lookup("Server"), Some(server));
//! assert_eq!(registry.descriptor(server).properties().len(), 1);
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

use super::error::SchemaError;

/// Opaque handle to a type inside a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// The "unknown" sentinel, present in every registry.
    pub const UNKNOWN: TypeId = TypeId(0);
    /// Builtin atomic `String`.
    pub const STRING: TypeId = TypeId(1);
    /// Builtin atomic `Integer`.
    pub const INTEGER: TypeId = TypeId(2);
    /// Builtin atomic `Float`.
    pub const FLOAT: TypeId = TypeId(3);
    /// Builtin atomic `Boolean`.
    pub const BOOLEAN: TypeId = TypeId(4);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Name of the unknown sentinel type.
pub const UNKNOWN_TYPE_NAME: &str = "<unknown>";

const BUILTIN_ATOMICS: [(&str, TypeId); 4] = [
    ("String", TypeId::STRING),
    ("Integer", TypeId::INTEGER),
    ("Float", TypeId::FLOAT),
    ("Boolean", TypeId::BOOLEAN),
];

/// The shape of values a type describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Sentinel for "no type information".
    Unknown,
    /// A scalar.
    Atomic,
    /// A domain-specific type with declared, named properties.
    Bean,
    /// A string-keyed map whose values all have the same type.
    Map { value: TypeId },
    /// A list of elements of one type.
    Sequence { element: TypeId },
}

/// Deprecation metadata of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deprecation {
    /// Path of the property that replaces this one.
    pub replacement: Option<String>,
    pub reason: Option<String>,
}

/// A named, typed property of a bean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedProperty {
    pub name: String,
    pub ty: TypeId,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

impl TypedProperty {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            deprecation: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }
}

/// Description of one schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    properties: IndexMap<String, TypedProperty>,
    hints: Vec<String>,
    description: Option<String>,
}

impl TypeDescriptor {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: IndexMap::new(),
            hints: Vec::new(),
            description: None,
        }
    }

    /// Display name; not an identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Properties keyed by name, in declaration order.
    pub fn properties(&self) -> &IndexMap<String, TypedProperty> {
        &self.properties
    }

    /// Suggested literal values; empty unless the type is a restricted atomic.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Mutable construction phase of a [`SchemaRegistry`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    sequences: HashMap<TypeId, TypeId>,
    maps: HashMap<TypeId, TypeId>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates a builder holding the unknown sentinel and the builtin atomics.
    pub fn new() -> Self {
        let mut builder = Self {
            types: vec![TypeDescriptor::new(UNKNOWN_TYPE_NAME, TypeKind::Unknown)],
            by_name: HashMap::new(),
            sequences: HashMap::new(),
            maps: HashMap::new(),
        };
        for (name, id) in BUILTIN_ATOMICS {
            let mut descriptor = TypeDescriptor::new(name, TypeKind::Atomic);
            if id == TypeId::BOOLEAN {
                descriptor.hints = vec!["true".to_string(), "false".to_string()];
            }
            let registered = builder.push(descriptor);
            debug_assert_eq!(registered, id);
            builder.by_name.insert(name.to_string(), id);
        }
        builder
    }

    fn push(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId(self.types.len());
        trace!("registering type {} as {:?}", descriptor.name, id);
        self.types.push(descriptor);
        id
    }

    fn declare(&mut self, descriptor: TypeDescriptor) -> Result<TypeId, SchemaError> {
        if self.by_name.contains_key(&descriptor.name) {
            return Err(SchemaError::DuplicateType(descriptor.name));
        }
        let name = descriptor.name.clone();
        let id = self.push(descriptor);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Declares a new unrestricted atomic type.
    pub fn atomic(&mut self, name: &str) -> Result<TypeId, SchemaError> {
        self.declare(TypeDescriptor::new(name, TypeKind::Atomic))
    }

    /// Declares an atomic type restricted to the given literal values.
    pub fn enumeration<I, S>(&mut self, name: &str, values: I) -> Result<TypeId, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut descriptor = TypeDescriptor::new(name, TypeKind::Atomic);
        descriptor.hints = values.into_iter().map(Into::into).collect();
        self.declare(descriptor)
    }

    /// Declares a bean. Properties are added afterwards with
    /// [`property`](Self::property), so beans may refer to each other.
    pub fn declare_bean(&mut self, name: &str) -> Result<TypeId, SchemaError> {
        self.declare(TypeDescriptor::new(name, TypeKind::Bean))
    }

    /// Adds a property to a bean.
    pub fn property(&mut self, bean: TypeId, property: TypedProperty) -> Result<(), SchemaError> {
        let descriptor = &mut self.types[bean.0];
        if descriptor.kind != TypeKind::Bean {
            return Err(SchemaError::NotABean(descriptor.name.clone()));
        }
        if descriptor.properties.contains_key(&property.name) {
            return Err(SchemaError::DuplicateProperty {
                type_name: descriptor.name.clone(),
                property: property.name,
            });
        }
        descriptor
            .properties
            .insert(property.name.clone(), property);
        Ok(())
    }

    /// Attaches a description to a type.
    pub fn describe(&mut self, ty: TypeId, description: impl Into<String>) {
        self.types[ty.0].description = Some(description.into());
    }

    /// Returns the sequence type with the given element type, creating it on
    /// first use.
    pub fn sequence_of(&mut self, element: TypeId) -> TypeId {
        if let Some(id) = self.sequences.get(&element) {
            return *id;
        }
        let name = format!("List<{}>", self.types[element.0].name);
        let id = self.push(TypeDescriptor::new(name, TypeKind::Sequence { element }));
        self.sequences.insert(element, id);
        id
    }

    /// Returns the string-keyed map type with the given value type, creating
    /// it on first use.
    pub fn map_of(&mut self, value: TypeId) -> TypeId {
        if let Some(id) = self.maps.get(&value) {
            return *id;
        }
        let name = format!("Map<String, {}>", self.types[value.0].name);
        let id = self.push(TypeDescriptor::new(name, TypeKind::Map { value }));
        self.maps.insert(value, id);
        id
    }

    /// Looks up a declared or builtin type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Freezes the builder into an immutable registry.
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            types: self.types,
            by_name: self.by_name,
            root: None,
        }
    }
}

/// An immutable set of schema types.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    root: Option<TypeId>,
}

impl SchemaRegistry {
    /// Returns the descriptor of `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` was produced by a different registry with more types.
    pub fn descriptor(&self, ty: TypeId) -> &TypeDescriptor {
        &self.types[ty.0]
    }

    /// Looks up a declared or builtin type by name.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn unknown(&self) -> TypeId {
        TypeId::UNKNOWN
    }

    /// The type documents of this schema start at, if one was set.
    pub fn root(&self) -> Option<TypeId> {
        self.root
    }

    pub fn with_root(mut self, root: TypeId) -> Self {
        self.root = Some(root);
        self
    }

    /// Iterates over every type, the sentinel included.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| (TypeId(idx), descriptor))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: every registry holds the sentinel and the builtin
    /// atomics.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = SchemaBuilder::new().build();
        assert_eq!(registry.lookup("String"), Some(TypeId::STRING));
        assert_eq!(registry.lookup("Integer"), Some(TypeId::INTEGER));
        assert_eq!(registry.lookup("Float"), Some(TypeId::FLOAT));
        assert_eq!(registry.lookup("Boolean"), Some(TypeId::BOOLEAN));
        assert_eq!(registry.descriptor(TypeId::UNKNOWN).kind(), TypeKind::Unknown);
        assert_eq!(registry.len(), 5);
        assert!(!registry.is_empty());
        assert_eq!(registry.descriptor(TypeId::BOOLEAN).hints(), &["true", "false"]);
        assert!(registry.descriptor(TypeId::STRING).hints().is_empty());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut builder = SchemaBuilder::new();
        builder.declare_bean("Server").unwrap();
        assert_eq!(
            builder.atomic("Server"),
            Err(SchemaError::DuplicateType("Server".to_string()))
        );
        assert!(builder.declare_bean("String").is_err());
    }

    #[test]
    fn test_property_on_atomic_rejected() {
        let mut builder = SchemaBuilder::new();
        let err = builder
            .property(TypeId::STRING, TypedProperty::new("x", TypeId::STRING))
            .unwrap_err();
        assert_eq!(err, SchemaError::NotABean("String".to_string()));
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let mut builder = SchemaBuilder::new();
        let bean = builder.declare_bean("Server").unwrap();
        builder
            .property(bean, TypedProperty::new("port", TypeId::INTEGER))
            .unwrap();
        assert!(matches!(
            builder.property(bean, TypedProperty::new("port", TypeId::STRING)),
            Err(SchemaError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_containers_are_interned() {
        let mut builder = SchemaBuilder::new();
        let a = builder.sequence_of(TypeId::STRING);
        let b = builder.sequence_of(TypeId::STRING);
        let m = builder.map_of(TypeId::STRING);
        assert_eq!(a, b);
        assert_ne!(a, m);
        assert_eq!(builder.map_of(TypeId::STRING), m);

        let registry = builder.build();
        assert_eq!(registry.descriptor(a).name(), "List<String>");
        assert_eq!(registry.descriptor(m).name(), "Map<String, String>");
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let mut builder = SchemaBuilder::new();
        let bean = builder.declare_bean("Config").unwrap();
        for name in ["zeta", "alpha", "mid"] {
            builder
                .property(bean, TypedProperty::new(name, TypeId::STRING))
                .unwrap();
        }
        let registry = builder.build();
        let names: Vec<&str> = registry
            .descriptor(bean)
            .properties()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_enumeration_hints() {
        let mut builder = SchemaBuilder::new();
        let level = builder.enumeration("LogLevel", ["INFO", "DEBUG"]).unwrap();
        let registry = builder.build();
        assert_eq!(registry.descriptor(level).hints(), &["INFO", "DEBUG"]);
        assert_eq!(registry.descriptor(level).kind(), TypeKind::Atomic);
    }
}
