// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host-declared classes (parents of generated types).

use super::{ConstructorDescriptor, ParameterDescriptor, TypeDescriptor, TypeHandle, TypeKind};
use crate::error::{Error, Result};
use crate::value::Value;
use std::sync::Arc;

/// A class member and the value its parameterless constructor assigns.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    name: Arc<str>,
    member_type: TypeHandle,
    initial: Value,
    can_write: bool,
}

impl MemberDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn member_type(&self) -> &TypeHandle {
        &self.member_type
    }

    /// Value after default construction.
    #[must_use]
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.can_write
    }
}

/// Class layout.
#[derive(Debug)]
pub struct ClassDescriptor {
    base: Option<TypeHandle>,
    members: Vec<MemberDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    is_sealed: bool,
}

impl ClassDescriptor {
    /// Declared base class (`None` means `Object`).
    #[must_use]
    pub fn base(&self) -> Option<&TypeHandle> {
        self.base.as_ref()
    }

    /// Members declared by this class (not its bases).
    #[must_use]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[must_use]
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// A class without declared constructors gets an implicit parameterless one.
    #[must_use]
    pub fn has_default_constructor(&self) -> bool {
        self.constructors.is_empty() || self.constructors.iter().any(ConstructorDescriptor::is_default)
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.is_sealed
    }
}

/// Builder for host classes.
///
/// ```
/// use anon_types::types::{ClassBuilder, TypeHandle};
///
/// let with_ctor = ClassBuilder::new("Sample.WithConstructor")
///     .constructor(&[("value", TypeHandle::int32())])
///     .build()?;
/// assert!(!with_ctor.has_default_constructor());
/// # Ok::<(), anon_types::Error>(())
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    base: Option<TypeHandle>,
    members: Vec<MemberDescriptor>,
    constructors: Vec<ConstructorDescriptor>,
    is_sealed: bool,
}

impl ClassBuilder {
    /// Create a new builder for a class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            members: Vec::new(),
            constructors: Vec::new(),
            is_sealed: false,
        }
    }

    /// Derive from another host class.
    #[must_use]
    pub fn base(mut self, base: &TypeHandle) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add a writable member initialized to `initial`.
    ///
    /// Every instance starts with a clone of `initial`, except that a
    /// [`Value::Object`] default becomes a new object per instance, like a
    /// field initializer run by the parameterless constructor.
    #[must_use]
    pub fn member(self, name: impl Into<Arc<str>>, member_type: TypeHandle, initial: Value) -> Self {
        self.push_member(name, member_type, initial, true)
    }

    /// Add a read-only member initialized to `initial`.
    #[must_use]
    pub fn read_only_member(
        self,
        name: impl Into<Arc<str>>,
        member_type: TypeHandle,
        initial: Value,
    ) -> Self {
        self.push_member(name, member_type, initial, false)
    }

    /// Declare an explicit parameterless constructor.
    #[must_use]
    pub fn default_constructor(mut self) -> Self {
        self.constructors.push(ConstructorDescriptor::default());
        self
    }

    /// Declare a constructor taking the given parameters.
    #[must_use]
    pub fn constructor(mut self, parameters: &[(&str, TypeHandle)]) -> Self {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(index, (name, ty))| ParameterDescriptor::new(*name, ty.clone(), index))
            .collect();
        self.constructors.push(ConstructorDescriptor::new(parameters));
        self
    }

    /// Forbid derivation.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Build the class.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if the base is not a host class or an
    /// initial value does not fit its member type.
    pub fn build(self) -> Result<TypeHandle> {
        if let Some(base) = &self.base {
            if !matches!(base.kind(), TypeKind::Class(_)) {
                return Err(Error::Configuration(format!(
                    "base of class '{}' must be a class, got '{}'",
                    self.name, base
                )));
            }
        }

        for member in &self.members {
            if !member.member_type.accepts(&member.initial) {
                return Err(Error::TypeMismatch {
                    name: format!("{}.{}", self.name, member.name),
                    expected: member.member_type.full_name().to_string(),
                    actual: member.initial.type_name(),
                });
            }
        }

        let class = ClassDescriptor {
            base: self.base,
            members: self.members,
            constructors: self.constructors,
            is_sealed: self.is_sealed,
        };
        Ok(TypeHandle::new(TypeDescriptor::class(self.name, class)))
    }

    fn push_member(
        mut self,
        name: impl Into<Arc<str>>,
        member_type: TypeHandle,
        initial: Value,
        can_write: bool,
    ) -> Self {
        self.members.push(MemberDescriptor {
            name: name.into(),
            member_type,
            initial,
            can_write,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_default_constructor() {
        let class = ClassBuilder::new("Plain").build().expect("class");
        assert!(class.has_default_constructor());
        assert!(class.constructors().is_empty());
    }

    #[test]
    fn test_parameterized_constructor_removes_default() {
        let class = ClassBuilder::new("WithCtor")
            .constructor(&[("value", TypeHandle::int32())])
            .build()
            .expect("class");
        assert!(!class.has_default_constructor());

        let both = ClassBuilder::new("Both")
            .constructor(&[("value", TypeHandle::int32())])
            .default_constructor()
            .build()
            .expect("class");
        assert!(both.has_default_constructor());
    }

    #[test]
    fn test_base_must_be_class() {
        let err = ClassBuilder::new("Bad")
            .base(&TypeHandle::string())
            .build()
            .expect_err("string is not a class");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_initial_value_checked() {
        let err = ClassBuilder::new("Bad")
            .member("Value", TypeHandle::int32(), Value::from("two"))
            .build()
            .expect_err("string does not fit Int32");
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_base_chain() {
        let base = ClassBuilder::new("Base").build().expect("base");
        let derived = ClassBuilder::new("Derived").base(&base).build().expect("derived");
        assert!(derived.is_subclass_of(&base));
        assert!(derived.is_subclass_of(&TypeHandle::object()));
        assert!(!base.is_subclass_of(&derived));
    }
}
