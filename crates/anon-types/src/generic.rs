// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open templates.
//!
//! A template fixes property names, mutability and parent but leaves every
//! property type as a parameter. Binding it to concrete types goes through
//! [`TypeFactory::instantiate`](crate::TypeFactory::instantiate), which
//! caches the closed type under (template, arguments), so records sharing
//! names but differing in field types reuse one template.

use crate::error::{Error, Result};
use crate::types::{GenericShape, PropertyDescriptor, TypeHandle};
use std::fmt;

/// Handle to an open generated template.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GenericTemplate(TypeHandle);

impl GenericTemplate {
    /// Wrap a type known to be an open template.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if `ty` is not a generic type definition.
    pub fn from_type(ty: TypeHandle) -> Result<Self> {
        if ty.is_generic_type_definition() {
            Ok(Self(ty))
        } else {
            Err(Error::Configuration(format!(
                "'{}' is not a generic type definition",
                ty
            )))
        }
    }

    /// Underlying type.
    #[must_use]
    pub fn handle(&self) -> &TypeHandle {
        &self.0
    }

    #[must_use]
    pub fn into_handle(self) -> TypeHandle {
        self.0
    }

    /// Number of type parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.0.properties().len()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.properties().iter().map(PropertyDescriptor::name)
    }

    /// Unbound type parameters, in property order.
    #[must_use]
    pub fn parameters(&self) -> &[TypeHandle] {
        match self.0.as_anonymous().map(|anonymous| anonymous.shape()) {
            Some(GenericShape::Definition { parameters }) => parameters.as_slice(),
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.0.as_anonymous().is_some_and(|anonymous| anonymous.is_mutable())
    }

    /// Declared parent (`None` means `Object`).
    #[must_use]
    pub fn parent(&self) -> Option<&TypeHandle> {
        self.0.as_anonymous().and_then(|anonymous| anonymous.parent())
    }

    /// Check if `ty` was bound from this template.
    #[must_use]
    pub fn is_definition_of(&self, ty: &TypeHandle) -> bool {
        !ty.is_generic_type_definition()
            && ty.generic_type_definition().as_ref() == Some(&self.0)
    }
}

impl From<GenericTemplate> for TypeHandle {
    fn from(template: GenericTemplate) -> Self {
        template.0
    }
}

impl fmt::Debug for GenericTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericTemplate({:?})", self.0)
    }
}

impl fmt::Display for GenericTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
