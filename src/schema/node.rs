//! Assist-context nodes: positions inside a schema rather than a document.
//!
//! A [`SchemaNode`] lets the generic path machinery walk the schema itself,
//! which is what completion needs when the document does not contain the
//! path yet.

use std::fmt;

use super::types::{SchemaRegistry, TypeId, TypeKind};
use crate::yamlpath::navigable::mismatch;
use crate::yamlpath::{Navigable, Navigation, NavigationError, PathSegment};

/// A type within a registry, navigated by its schema shape.
#[derive(Clone, Copy)]
pub struct SchemaNode<'r> {
    registry: &'r SchemaRegistry,
    ty: TypeId,
}

impl<'r> SchemaNode<'r> {
    pub fn new(registry: &'r SchemaRegistry, ty: TypeId) -> Self {
        Self { registry, ty }
    }

    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    fn child(&self, ty: TypeId) -> Self {
        Self::new(self.registry, ty)
    }

    fn kind_name(&self) -> String {
        let descriptor = self.registry.descriptor(self.ty);
        match descriptor.kind() {
            TypeKind::Unknown => "unknown type".to_string(),
            TypeKind::Atomic => format!("atomic type {}", descriptor.name()),
            TypeKind::Bean => format!("type {}", descriptor.name()),
            TypeKind::Map { .. } | TypeKind::Sequence { .. } => descriptor.name().to_string(),
        }
    }
}

impl fmt::Debug for SchemaNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("ty", &self.ty)
            .field("name", &self.registry.descriptor(self.ty).name())
            .finish()
    }
}

impl PartialEq for SchemaNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.registry, other.registry) && self.ty == other.ty
    }
}

impl<'r> Navigable for SchemaNode<'r> {
    fn traverse(&self, segment: &PathSegment) -> Navigation<Self> {
        let descriptor = self.registry.descriptor(self.ty);
        let applies = match descriptor.kind() {
            TypeKind::Bean | TypeKind::Map { .. } => segment.applies_to_map(),
            TypeKind::Sequence { .. } => segment.applies_to_sequence(),
            TypeKind::Atomic | TypeKind::Unknown => *segment == PathSegment::Wildcard,
        };
        if !applies {
            return Err(mismatch(segment, self.kind_name()));
        }

        match (segment, descriptor.kind()) {
            (PathSegment::Key(key), TypeKind::Bean) => match descriptor.properties().get(key) {
                Some(property) => Ok(vec![self.child(property.ty)]),
                None => Err(NavigationError::NoSuchKey { key: key.clone() }),
            },
            (PathSegment::Key(_), TypeKind::Map { value }) => Ok(vec![self.child(value)]),
            (PathSegment::Index(_), TypeKind::Sequence { element }) => {
                Ok(vec![self.child(element)])
            }
            (PathSegment::Wildcard, TypeKind::Bean) => Ok(descriptor
                .properties()
                .values()
                .map(|property| self.child(property.ty))
                .collect()),
            (PathSegment::Wildcard, TypeKind::Map { value: domain })
            | (PathSegment::Wildcard, TypeKind::Sequence { element: domain }) => {
                Ok(vec![self.child(domain)])
            }
            _ => Ok(Vec::new()),
        }
    }
}
