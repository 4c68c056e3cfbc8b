//! Classification queries over schema types and type-aware path resolution.

use indexmap::IndexMap;
use log::trace;

use super::error::{ResolveError, ResolveErrorKind};
use super::types::{SchemaRegistry, TypeId, TypeKind, TypedProperty};
use crate::yamlpath::{PathSegment, YamlPath};

/// Queries that completion and validation code asks about schema types.
///
/// Classification is total: every query answers for every handle, and the
/// unknown sentinel simply answers "no" to every `is_*` question.
pub trait TypeUtil {
    /// True if the type has no navigable internal structure.
    fn is_atomic(&self, ty: TypeId) -> bool;

    /// True if the type addresses children by string key.
    fn is_map(&self, ty: TypeId) -> bool;

    /// True if the type addresses children by index.
    fn is_sequencable(&self, ty: TypeId) -> bool;

    /// True for a map type that accepts any key, as opposed to a bean whose
    /// keys are its declared properties.
    fn is_open_map(&self, ty: TypeId) -> bool;

    fn is_unknown(&self, ty: TypeId) -> bool {
        !self.is_atomic(ty) && !self.is_map(ty) && !self.is_sequencable(ty)
    }

    /// Element type of a sequence or value type of a map; the unknown
    /// sentinel for every other type.
    fn get_domain_type(&self, ty: TypeId) -> TypeId;

    /// Suggested literal values for a restricted atomic type.
    fn get_hint_values(&self, ty: TypeId) -> &[String];

    /// Declared properties keyed by name, in declaration order.
    fn get_properties_map(&self, ty: TypeId) -> &IndexMap<String, TypedProperty>;

    /// Declared properties in declaration order.
    fn get_properties(&self, ty: TypeId) -> Vec<&TypedProperty> {
        self.get_properties_map(ty).values().collect()
    }

    /// Human-readable name, for display only.
    fn nice_type_name(&self, ty: TypeId) -> String;

    /// Resolves the type expected at the end of `path`, starting at `root`.
    ///
    /// Keys are looked up in declared properties; an open map with no
    /// declared properties accepts any key. Indices and wildcards require a
    /// sequencable type.
    fn resolve(&self, root: TypeId, path: &YamlPath) -> Result<TypeId, ResolveError> {
        let mut current = root;
        for (depth, segment) in path.segments().iter().enumerate() {
            let reached = current;
            let fail = move |kind: ResolveErrorKind| {
                trace!("resolution of '{}' stopped at depth {}: {}", path, depth, kind);
                ResolveError {
                    kind,
                    resolved: path.prefix(depth),
                    reached,
                }
            };

            if self.is_unknown(current) {
                return Err(fail(ResolveErrorKind::UnknownType));
            }

            current = match segment {
                PathSegment::Key(name) => {
                    if self.is_atomic(current) {
                        return Err(fail(ResolveErrorKind::AtomicType {
                            type_name: self.nice_type_name(current),
                        }));
                    }
                    if !self.is_map(current) {
                        return Err(fail(ResolveErrorKind::NotAMap {
                            type_name: self.nice_type_name(current),
                        }));
                    }
                    match self.get_properties_map(current).get(name) {
                        Some(property) => property.ty,
                        None if self.is_open_map(current) => self.get_domain_type(current),
                        None => {
                            return Err(fail(ResolveErrorKind::UnknownProperty {
                                property: name.clone(),
                                type_name: self.nice_type_name(current),
                            }))
                        }
                    }
                }
                PathSegment::Index(_) | PathSegment::Wildcard => {
                    if !self.is_sequencable(current) {
                        return Err(fail(ResolveErrorKind::NotSequencable {
                            type_name: self.nice_type_name(current),
                        }));
                    }
                    self.get_domain_type(current)
                }
            };
        }
        Ok(current)
    }
}

impl TypeUtil for SchemaRegistry {
    fn is_atomic(&self, ty: TypeId) -> bool {
        self.descriptor(ty).kind() == TypeKind::Atomic
    }

    fn is_map(&self, ty: TypeId) -> bool {
        matches!(self.descriptor(ty).kind(), TypeKind::Bean | TypeKind::Map { .. })
    }

    fn is_sequencable(&self, ty: TypeId) -> bool {
        matches!(self.descriptor(ty).kind(), TypeKind::Sequence { .. })
    }

    fn is_open_map(&self, ty: TypeId) -> bool {
        matches!(self.descriptor(ty).kind(), TypeKind::Map { .. })
    }

    fn is_unknown(&self, ty: TypeId) -> bool {
        self.descriptor(ty).kind() == TypeKind::Unknown
    }

    fn get_domain_type(&self, ty: TypeId) -> TypeId {
        match self.descriptor(ty).kind() {
            TypeKind::Map { value } => value,
            TypeKind::Sequence { element } => element,
            _ => TypeId::UNKNOWN,
        }
    }

    fn get_hint_values(&self, ty: TypeId) -> &[String] {
        self.descriptor(ty).hints()
    }

    fn get_properties_map(&self, ty: TypeId) -> &IndexMap<String, TypedProperty> {
        self.descriptor(ty).properties()
    }

    fn nice_type_name(&self, ty: TypeId) -> String {
        self.descriptor(ty).name().to_string()
    }
}
