// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type emission backends.
//!
//! A backend turns validated requests into type descriptors: it defines
//! open templates and closes them over concrete argument types. Validation
//! (parent rules, duplicate names, arity) happens in
//! [`TypeBuilder`](crate::builder::TypeBuilder) before a backend is called,
//! and the [`TypeCache`](crate::cache::TypeCache) serializes calls, so a
//! backend never sees two requests at once from the same factory.

mod schema;

pub use schema::SchemaBackend;

use crate::error::BackendError;
use crate::types::{TypeDescriptor, TypeHandle};
use std::sync::Arc;

/// Request to define an open template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRequest<'a> {
    /// Simple name of the template.
    pub name: &'a str,
    /// Property names in declaration order.
    pub property_names: &'a [Arc<str>],
    /// Generic parameter names, one per property.
    pub parameter_names: &'a [String],
    /// Whether properties get public setters.
    pub is_mutable: bool,
    /// Host class to derive from (`None` means `Object`).
    pub parent: Option<&'a TypeHandle>,
}

/// Emits generated types.
pub trait EmissionBackend: Send + Sync {
    /// Define an open template.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend cannot emit the template.
    fn define_template(&self, request: &TemplateRequest<'_>) -> Result<TypeDescriptor, BackendError>;

    /// Bind `arguments` (one per property, in order) into `template`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend cannot emit the closed type.
    fn close_template(
        &self,
        template: &TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeDescriptor, BackendError>;
}
