// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! Every type the factory works with, whether primitive, host-declared or
//! generated, is an immutable [`TypeDescriptor`] behind a shared
//! [`TypeHandle`]. Handles compare by identity: two handles are equal only if
//! they point at the same descriptor, which is what makes cached generated
//! types interchangeable across calls.
//!
//! # Example
//!
//! ```
//! use anon_types::types::{ClassBuilder, TypeHandle};
//! use anon_types::Value;
//!
//! let parent = ClassBuilder::new("Sample.Base")
//!     .member("Value", TypeHandle::int32(), Value::I32(2))
//!     .build()?;
//!
//! assert!(parent.has_default_constructor());
//! assert!(parent.is_subclass_of(&TypeHandle::object()));
//! # Ok::<(), anon_types::Error>(())
//! ```

mod anonymous;
mod class;
mod primitive;

pub use anonymous::{
    AnonymousDescriptor, ConstructorDescriptor, GenericShape, InheritedMember,
    ParameterDescriptor, PropertyDescriptor,
};
pub use class::{ClassBuilder, ClassDescriptor, MemberDescriptor};
pub use primitive::PrimitiveKind;

use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// First identity handed out to non-primitive types.
const FIRST_DYNAMIC_ID: u64 = 0x100;

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(FIRST_DYNAMIC_ID);

/// Process-unique type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u64);

impl TypeId {
    /// Allocate a fresh identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    const fn of_primitive(kind: PrimitiveKind) -> Self {
        Self(kind as u64 + 1)
    }

    /// Raw identity value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type kind enumeration.
#[derive(Debug)]
pub enum TypeKind {
    /// Built-in primitive.
    Primitive(PrimitiveKind),
    /// Host-declared class, usable as a parent of generated types.
    Class(ClassDescriptor),
    /// Generated structural type (open template or closed instantiation).
    Anonymous(AnonymousDescriptor),
    /// Unbound type parameter of a template.
    GenericParameter {
        /// Position in the owning template's parameter list.
        position: usize,
    },
}

/// A complete type descriptor.
#[derive(Debug)]
pub struct TypeDescriptor {
    id: TypeId,
    name: Arc<str>,
    full_name: Arc<str>,
    kind: TypeKind,
}

impl TypeDescriptor {
    fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            id: TypeId::of_primitive(kind),
            name: kind.name().into(),
            full_name: kind.full_name().into(),
            kind: TypeKind::Primitive(kind),
        }
    }

    /// Create a host class descriptor.
    pub fn class(name: impl Into<Arc<str>>, class: ClassDescriptor) -> Self {
        let name = name.into();
        Self {
            id: TypeId::next(),
            full_name: Arc::clone(&name),
            name,
            kind: TypeKind::Class(class),
        }
    }

    /// Create a generated type descriptor.
    ///
    /// A closed instantiation keeps the template's simple name; its full name
    /// lists the bound arguments.
    pub fn anonymous(name: impl Into<Arc<str>>, anonymous: AnonymousDescriptor) -> Self {
        let name = name.into();
        let full_name: Arc<str> = match anonymous.shape() {
            GenericShape::Definition { .. } => Arc::clone(&name),
            GenericShape::Instance { arguments, .. } => {
                let args: Vec<&str> = arguments.iter().map(TypeHandle::full_name).collect();
                format!("{}[{}]", name, args.join(",")).into()
            }
        };
        Self {
            id: TypeId::next(),
            name,
            full_name,
            kind: TypeKind::Anonymous(anonymous),
        }
    }

    /// Create a generic parameter descriptor.
    pub fn generic_parameter(name: impl Into<Arc<str>>, position: usize) -> Self {
        let name = name.into();
        Self {
            id: TypeId::next(),
            full_name: Arc::clone(&name),
            name,
            kind: TypeKind::GenericParameter { position },
        }
    }

    /// Type identity.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full name (namespace and bound generic arguments included).
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Type kind.
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}

/// Shared, identity-compared handle to a [`TypeDescriptor`].
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeDescriptor>);

impl TypeHandle {
    /// Wrap a descriptor into a new type.
    #[must_use]
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self(Arc::new(descriptor))
    }

    /// Handle of a primitive type.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        primitive::handle(kind)
    }

    /// The universal top type.
    #[must_use]
    pub fn object() -> Self {
        Self::primitive(PrimitiveKind::Object)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    #[must_use]
    pub fn char() -> Self {
        Self::primitive(PrimitiveKind::Char)
    }

    #[must_use]
    pub fn int32() -> Self {
        Self::primitive(PrimitiveKind::Int32)
    }

    #[must_use]
    pub fn int64() -> Self {
        Self::primitive(PrimitiveKind::Int64)
    }

    #[must_use]
    pub fn double() -> Self {
        Self::primitive(PrimitiveKind::Double)
    }

    #[must_use]
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    #[must_use]
    pub fn date_time() -> Self {
        Self::primitive(PrimitiveKind::DateTime)
    }

    /// Underlying descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        self.0.full_name()
    }

    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    /// Returns `true` if both handles denote the same type object.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Primitive kind, if this is a primitive type.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind() {
            TypeKind::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Check if this is the universal top type.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveKind::Object)
    }

    /// Class details, if this is a host class.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassDescriptor> {
        match self.kind() {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Generated type details, if this is a generated type.
    #[must_use]
    pub fn as_anonymous(&self) -> Option<&AnonymousDescriptor> {
        match self.kind() {
            TypeKind::Anonymous(anonymous) => Some(anonymous),
            _ => None,
        }
    }

    /// Check if this is a generated type (open or closed).
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.as_anonymous().is_some()
    }

    /// Check if this is an open template.
    #[must_use]
    pub fn is_generic_type_definition(&self) -> bool {
        self.as_anonymous()
            .is_some_and(|a| matches!(a.shape(), GenericShape::Definition { .. }))
    }

    /// Check if this is an unbound type parameter.
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.kind(), TypeKind::GenericParameter { .. })
    }

    /// Bound arguments of a closed instantiation (empty otherwise).
    #[must_use]
    pub fn generic_arguments(&self) -> &[TypeHandle] {
        match self.as_anonymous().map(AnonymousDescriptor::shape) {
            Some(GenericShape::Instance { arguments, .. }) => arguments.as_slice(),
            _ => &[],
        }
    }

    /// Template a closed instantiation was bound from.
    #[must_use]
    pub fn generic_type_definition(&self) -> Option<TypeHandle> {
        match self.as_anonymous().map(AnonymousDescriptor::shape) {
            Some(GenericShape::Instance { definition, .. }) => Some(definition.clone()),
            Some(GenericShape::Definition { .. }) => Some(self.clone()),
            None => None,
        }
    }

    /// Declared properties of a generated type, in position order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        match self.as_anonymous() {
            Some(anonymous) => anonymous.properties(),
            None => &[],
        }
    }

    /// Declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.as_anonymous()?.property(name)
    }

    /// Public constructors.
    #[must_use]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        match self.kind() {
            TypeKind::Anonymous(anonymous) => std::slice::from_ref(anonymous.constructor()),
            TypeKind::Class(class) => class.constructors(),
            _ => &[],
        }
    }

    /// Check if an accessible parameterless constructor exists.
    #[must_use]
    pub fn has_default_constructor(&self) -> bool {
        match self.kind() {
            TypeKind::Primitive(kind) => *kind == PrimitiveKind::Object,
            TypeKind::Class(class) => class.has_default_constructor(),
            TypeKind::Anonymous(anonymous) => anonymous.constructor().is_default(),
            TypeKind::GenericParameter { .. } => false,
        }
    }

    /// Direct base type. Everything except `Object` itself derives from it
    /// when no other parent is declared.
    #[must_use]
    pub fn base_type(&self) -> Option<TypeHandle> {
        match self.kind() {
            TypeKind::Primitive(PrimitiveKind::Object) => None,
            TypeKind::Class(class) => Some(class.base().cloned().unwrap_or_else(Self::object)),
            TypeKind::Anonymous(anonymous) => {
                Some(anonymous.parent().cloned().unwrap_or_else(Self::object))
            }
            _ => Some(Self::object()),
        }
    }

    /// Check if `ancestor` appears in this type's base chain (excluding
    /// this type itself).
    #[must_use]
    pub fn is_subclass_of(&self, ancestor: &TypeHandle) -> bool {
        let mut current = self.base_type();
        while let Some(base) = current {
            if base == *ancestor {
                return true;
            }
            current = base.base_type();
        }
        false
    }

    /// Check if a value of type `other` can be stored in a slot of this type.
    #[must_use]
    pub fn is_assignable_from(&self, other: &TypeHandle) -> bool {
        self == other || self.is_object() || other.is_subclass_of(self)
    }

    /// Check if slots of this type can hold null.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self.kind() {
            TypeKind::Primitive(kind) => !kind.is_value_type(),
            TypeKind::GenericParameter { .. } => false,
            _ => true,
        }
    }

    /// Check if `value` can be stored in a slot of this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match value.runtime_type() {
            None => self.is_nullable(),
            Some(actual) => self.is_assignable_from(&actual),
        }
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({}#{})", self.full_name(), self.id())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_are_unique() {
        let a = TypeId::next();
        let b = TypeId::next();
        assert_ne!(a, b);
        assert!(a.as_u64() >= FIRST_DYNAMIC_ID);
    }

    #[test]
    fn test_handle_identity() {
        let a = TypeHandle::new(TypeDescriptor::generic_parameter("T", 0));
        let b = TypeHandle::new(TypeDescriptor::generic_parameter("T", 0));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.is_generic_parameter());
        assert!(!a.is_nullable());
    }

    #[test]
    fn test_object_accepts_everything() {
        let object = TypeHandle::object();
        assert!(object.accepts(&Value::Null));
        assert!(object.accepts(&Value::I32(1)));
        assert!(object.accepts(&Value::from("text")));
        assert!(object.base_type().is_none());
    }

    #[test]
    fn test_value_types_reject_null() {
        assert!(!TypeHandle::int32().accepts(&Value::Null));
        assert!(TypeHandle::string().accepts(&Value::Null));
        assert!(!TypeHandle::int32().accepts(&Value::I64(1)));
    }

    #[test]
    fn test_primitives_derive_from_object() {
        assert!(TypeHandle::int32().is_subclass_of(&TypeHandle::object()));
        assert!(!TypeHandle::object().is_subclass_of(&TypeHandle::object()));
        assert!(TypeHandle::object().has_default_constructor());
        assert!(!TypeHandle::string().has_default_constructor());
    }
}
