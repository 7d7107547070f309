// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instances of generated types.
//!
//! An instance is a schema pointer plus two slot arrays: one slot per
//! declared property and one per member inherited from the parent class
//! chain. A property named like an inherited member gets its own slot and
//! hides the inherited one; the inherited slot stays reachable through
//! [`Instance::upcast`].
//!
//! Equality, hashing and rendering only look at declared properties, in
//! declaration order:
//!
//! ```text
//! equal  <=> same generated type && every property pairwise equal
//! hash    = fold(HASH_SEED, |acc, v| acc * HASH_MULTIPLIER + hash(v))
//! render  = "{ b = test, a = 1 }"   ("{ }" when empty)
//! ```

use crate::config::{HASH_MULTIPLIER, HASH_SEED};
use crate::error::{Error, Result};
use crate::types::{AnonymousDescriptor, InheritedMember, PropertyDescriptor, TypeHandle};
use crate::value::{ObjectRef, Value};
use parking_lot::RwLock;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct InstanceData {
    ty: TypeHandle,
    own: RwLock<Vec<Value>>,
    inherited: RwLock<Vec<Value>>,
}

/// Shared reference to an instance of a generated type.
///
/// Cloning yields another reference to the same instance.
#[derive(Clone)]
pub struct Instance(Arc<InstanceData>);

impl Instance {
    /// Run the constructor of `ty` with `arguments` in parameter order.
    ///
    /// Inherited members take the values assigned by the parent's
    /// parameterless constructor. A member whose default is an object gets a
    /// fresh object per instance.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if `ty` is not a closed generated type
    /// - [`Error::ArgumentCount`] if the argument count differs from the
    ///   parameter count
    /// - [`Error::TypeMismatch`] if an argument does not fit its parameter
    pub fn construct(ty: &TypeHandle, arguments: Vec<Value>) -> Result<Self> {
        let Some(layout) = ty.as_anonymous() else {
            return Err(Error::Configuration(format!(
                "'{}' is not a generated type",
                ty
            )));
        };
        if ty.is_generic_type_definition() {
            return Err(Error::Configuration(format!(
                "'{}' is a generic type definition; bind its type arguments before constructing it",
                ty
            )));
        }

        let parameters = layout.constructor().parameters();
        if arguments.len() != parameters.len() {
            return Err(Error::ArgumentCount {
                type_name: ty.to_string(),
                expected: parameters.len(),
                actual: arguments.len(),
            });
        }
        for (parameter, argument) in parameters.iter().zip(&arguments) {
            if !parameter.parameter_type().accepts(argument) {
                return Err(Error::TypeMismatch {
                    name: parameter.name().to_string(),
                    expected: parameter.parameter_type().full_name().to_string(),
                    actual: argument.type_name(),
                });
            }
        }

        let inherited = layout
            .inherited()
            .iter()
            .map(|member| match member.member().initial() {
                Value::Object(_) => Value::Object(ObjectRef::new()),
                initial => initial.clone(),
            })
            .collect();

        Ok(Self(Arc::new(InstanceData {
            ty: ty.clone(),
            own: RwLock::new(arguments),
            inherited: RwLock::new(inherited),
        })))
    }

    /// Generated type of this instance.
    #[must_use]
    pub fn type_handle(&self) -> &TypeHandle {
        &self.0.ty
    }

    /// Returns `true` if both references denote the same instance.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Read a property through the generated type.
    ///
    /// Declared properties win over inherited members of the same name.
    ///
    /// # Errors
    ///
    /// [`Error::PropertyNotFound`] if neither a property nor an inherited
    /// member has that name.
    pub fn get(&self, name: &str) -> Result<Value> {
        if let Some(index) = self.layout().and_then(|layout| layout.property_index(name)) {
            return Ok(self.0.own.read()[index].clone());
        }
        match self.inherited_slot(name, None) {
            Some(index) => Ok(self.0.inherited.read()[index].clone()),
            None => Err(Error::PropertyNotFound(self.qualified(name))),
        }
    }

    /// Write a property through the generated type.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadOnlyProperty`] unless the type is mutable (or the
    ///   inherited member is writable)
    /// - [`Error::TypeMismatch`] if `value` does not fit the property type
    /// - [`Error::PropertyNotFound`] for an unknown name
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if let Some(property) = self.layout().and_then(|layout| layout.property(name)) {
            if !property.can_write() {
                return Err(Error::ReadOnlyProperty(self.qualified(name)));
            }
            check_fits(name, property.property_type(), &value)?;
            self.0.own.write()[property.position()] = value;
            return Ok(());
        }
        match self.inherited_slot(name, None) {
            Some(index) => self.set_inherited(index, name, value),
            None => Err(Error::PropertyNotFound(self.qualified(name))),
        }
    }

    /// Declared property values in declaration order.
    #[must_use]
    pub fn values(&self) -> Vec<Value> {
        self.0.own.read().clone()
    }

    /// Declared `(name, value)` pairs in declaration order.
    #[must_use]
    pub fn fields(&self) -> Vec<(Arc<str>, Value)> {
        let own = self.0.own.read();
        self.properties()
            .iter()
            .zip(own.iter())
            .map(|(property, value)| (Arc::clone(property.name_arc()), value.clone()))
            .collect()
    }

    /// View this instance as one of its ancestors.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if `ancestor` is not in the base chain.
    pub fn upcast(&self, ancestor: &TypeHandle) -> Result<BaseView> {
        if !self.type_handle().is_subclass_of(ancestor) {
            return Err(Error::Configuration(format!(
                "'{}' does not derive from '{}'",
                self.type_handle(),
                ancestor
            )));
        }
        Ok(BaseView {
            instance: self.clone(),
            ancestor: ancestor.clone(),
        })
    }

    /// Field-wise hash code.
    #[must_use]
    pub fn hash_code(&self) -> i32 {
        self.values()
            .iter()
            .fold(HASH_SEED, |acc, value| {
                acc.wrapping_mul(HASH_MULTIPLIER)
                    .wrapping_add(value.hash_code())
            })
    }

    fn layout(&self) -> Option<&AnonymousDescriptor> {
        self.0.ty.as_anonymous()
    }

    fn properties(&self) -> &[PropertyDescriptor] {
        self.0.ty.properties()
    }

    fn inherited_members(&self) -> &[InheritedMember] {
        match self.layout() {
            Some(layout) => layout.inherited(),
            None => &[],
        }
    }

    /// Most derived inherited slot named `name`, restricted to members
    /// visible from `ancestor` when given.
    fn inherited_slot(&self, name: &str, ancestor: Option<&TypeHandle>) -> Option<usize> {
        self.inherited_members().iter().rposition(|member| {
            member.member().name() == name
                && ancestor.map_or(true, |ancestor| {
                    member.owner() == ancestor || ancestor.is_subclass_of(member.owner())
                })
        })
    }

    fn set_inherited(&self, index: usize, name: &str, value: Value) -> Result<()> {
        let member = self.inherited_members()[index].member();
        if !member.can_write() {
            return Err(Error::ReadOnlyProperty(self.qualified(name)));
        }
        check_fits(name, member.member_type(), &value)?;
        self.0.inherited.write()[index] = value;
        Ok(())
    }

    fn qualified(&self, name: &str) -> String {
        format!("{}.{}", self.type_handle(), name)
    }
}

fn check_fits(name: &str, expected: &TypeHandle, value: &Value) -> Result<()> {
    if expected.accepts(value) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            name: name.to_string(),
            expected: expected.full_name().to_string(),
            actual: value.type_name(),
        })
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        if self.type_handle() != other.type_handle() {
            return false;
        }
        // Snapshots: never hold one instance's lock while taking another's.
        let a = self.values();
        let b = other.values();
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
    }
}

impl Eq for Instance {}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own = self.values();
        if own.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        for (index, (property, value)) in self.properties().iter().zip(own.iter()).enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", property.name(), value)?;
        }
        f.write_str(" }")
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_handle().full_name())
            .field("values", &self.values())
            .finish()
    }
}

/// An instance seen through an ancestor type.
///
/// Reads and writes only reach members that `ancestor` declares or
/// inherits; properties of the generated type are invisible.
#[derive(Debug, Clone)]
pub struct BaseView {
    instance: Instance,
    ancestor: TypeHandle,
}

impl BaseView {
    #[must_use]
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    #[must_use]
    pub fn ancestor(&self) -> &TypeHandle {
        &self.ancestor
    }

    /// Read a member visible from the ancestor type.
    ///
    /// # Errors
    ///
    /// [`Error::PropertyNotFound`] if the ancestor has no such member.
    pub fn get(&self, name: &str) -> Result<Value> {
        match self.instance.inherited_slot(name, Some(&self.ancestor)) {
            Some(index) => Ok(self.instance.0.inherited.read()[index].clone()),
            None => Err(Error::PropertyNotFound(format!("{}.{}", self.ancestor, name))),
        }
    }

    /// Write a member visible from the ancestor type.
    ///
    /// # Errors
    ///
    /// [`Error::PropertyNotFound`], [`Error::ReadOnlyProperty`] or
    /// [`Error::TypeMismatch`].
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.instance.inherited_slot(name, Some(&self.ancestor)) {
            Some(index) => self.instance.set_inherited(index, name, value.into()),
            None => Err(Error::PropertyNotFound(format!("{}.{}", self.ancestor, name))),
        }
    }
}
