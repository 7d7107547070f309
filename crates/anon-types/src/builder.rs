// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Validation and naming in front of an [`EmissionBackend`].

use crate::config::FactoryConfig;
use crate::emit::{EmissionBackend, TemplateRequest};
use crate::error::{Error, Result};
use crate::types::{TypeHandle, TypeKind};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Builds templates and closed types through a backend.
pub struct TypeBuilder {
    backend: Arc<dyn EmissionBackend>,
    next_index: AtomicUsize,
}

impl TypeBuilder {
    /// Create a builder over `backend`.
    pub fn new(backend: Arc<dyn EmissionBackend>) -> Self {
        Self {
            backend,
            next_index: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn EmissionBackend> {
        &self.backend
    }

    /// Number of templates defined so far.
    #[must_use]
    pub fn templates_built(&self) -> usize {
        self.next_index.load(Ordering::Relaxed)
    }

    /// Map `Object` to "no parent"; every other type is kept.
    #[must_use]
    pub fn normalize_parent(parent: Option<&TypeHandle>) -> Option<&TypeHandle> {
        parent.filter(|ty| !ty.is_object())
    }

    /// Check that `parent` can be derived from by a generated type.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if the parent is not an unsealed host class
    /// with a parameterless constructor.
    pub fn validate_parent(parent: &TypeHandle) -> Result<()> {
        match parent.kind() {
            TypeKind::Primitive(_) if parent.is_object() => Ok(()),
            TypeKind::Class(class) => {
                if class.is_sealed() {
                    Err(Error::Configuration(format!(
                        "parent type '{}' is sealed",
                        parent
                    )))
                } else if !class.has_default_constructor() {
                    Err(Error::Configuration(format!(
                        "parent type '{}' must have a default constructor",
                        parent
                    )))
                } else {
                    Ok(())
                }
            }
            TypeKind::Anonymous(_) => Err(Error::Configuration(format!(
                "parent type '{}' is a generated type and cannot be derived from",
                parent
            ))),
            TypeKind::Primitive(_) => Err(Error::Configuration(format!(
                "parent type '{}' is sealed",
                parent
            ))),
            TypeKind::GenericParameter { .. } => Err(Error::Configuration(format!(
                "parent type '{}' is an unbound type parameter",
                parent
            ))),
        }
    }

    /// Define an open template over `names`.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] for an invalid parent or a repeated name,
    /// [`Error::Construction`] if the backend fails.
    pub fn build_template(
        &self,
        config: &FactoryConfig,
        names: &[Arc<str>],
        is_mutable: bool,
        parent: Option<&TypeHandle>,
    ) -> Result<TypeHandle> {
        let parent = Self::normalize_parent(parent);
        if let Some(parent) = parent {
            Self::validate_parent(parent)?;
        }

        let mut seen = HashSet::with_capacity(names.len());
        if let Some(duplicate) = names.iter().find(|name| !seen.insert(&***name)) {
            return Err(Error::Configuration(format!(
                "property '{}' is declared more than once",
                duplicate
            )));
        }

        let start = Instant::now();
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let name = config.type_name(index, names.len());
        let parameter_names: Vec<String> = names
            .iter()
            .map(|property| config.generic_parameter_name(property))
            .collect();

        let request = TemplateRequest {
            name: &name,
            property_names: names,
            parameter_names: &parameter_names,
            is_mutable,
            parent,
        };
        let template = TypeHandle::new(self.backend.define_template(&request)?);

        log::debug!(
            "[TypeBuilder] defined template {} ({} properties, mutable={}) in {}ns",
            template,
            names.len(),
            is_mutable,
            start.elapsed().as_nanos()
        );
        Ok(template)
    }

    /// Close `template` over `arguments`.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if `template` is not an open template or an
    /// argument is itself open, [`Error::ArgumentCount`] on an arity
    /// mismatch, [`Error::Construction`] if the backend fails.
    pub fn build_instantiation(
        &self,
        template: &TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle> {
        if !template.is_generic_type_definition() {
            return Err(Error::Configuration(format!(
                "'{}' is not a generic type definition",
                template
            )));
        }

        let arity = template.properties().len();
        if arguments.len() != arity {
            return Err(Error::ArgumentCount {
                type_name: template.to_string(),
                expected: arity,
                actual: arguments.len(),
            });
        }

        if let Some(open) = arguments
            .iter()
            .find(|arg| arg.is_generic_type_definition() || arg.is_generic_parameter())
        {
            return Err(Error::Configuration(format!(
                "type argument '{}' of '{}' is not a closed type",
                open, template
            )));
        }

        let start = Instant::now();
        let closed = TypeHandle::new(self.backend.close_template(template, arguments)?);

        log::debug!(
            "[TypeBuilder] instantiated {} in {}ns",
            closed,
            start.elapsed().as_nanos()
        );
        Ok(closed)
    }
}

impl std::fmt::Debug for TypeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeBuilder")
            .field("templates_built", &self.templates_built())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::SchemaBackend;
    use crate::types::ClassBuilder;

    fn builder() -> TypeBuilder {
        TypeBuilder::new(Arc::new(SchemaBackend))
    }

    fn names(list: &[&str]) -> Vec<Arc<str>> {
        list.iter().map(|name| Arc::from(*name)).collect()
    }

    #[test]
    fn test_template_naming() {
        let builder = builder();
        let config = FactoryConfig::default();
        let first = builder
            .build_template(&config, &names(&["b", "a"]), false, None)
            .expect("template");
        let second = builder
            .build_template(&config, &names(&["x"]), true, None)
            .expect("template");
        assert_eq!(first.name(), "<>f__LatticeUtilsAnonymousType0`2");
        assert_eq!(second.name(), "<>f__LatticeUtilsAnonymousType1`1");
        assert_eq!(builder.templates_built(), 2);
        assert!(second.properties()[0].can_write());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = builder()
            .build_template(&FactoryConfig::default(), &names(&["a", "a"]), false, None)
            .expect_err("duplicate");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_parent_without_default_constructor() {
        let parent = ClassBuilder::new("Sample.NoDefault")
            .constructor(&[("value", TypeHandle::int32())])
            .build()
            .expect("class");
        let err = builder()
            .build_template(&FactoryConfig::default(), &names(&["a"]), false, Some(&parent))
            .expect_err("no default constructor");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("must have a default constructor"));
    }

    #[test]
    fn test_invalid_parents() {
        let sealed = ClassBuilder::new("Sample.Sealed").sealed().build().expect("class");
        assert!(TypeBuilder::validate_parent(&sealed).is_err());
        assert!(TypeBuilder::validate_parent(&TypeHandle::int32()).is_err());
        assert!(TypeBuilder::validate_parent(&TypeHandle::string()).is_err());
        assert!(TypeBuilder::validate_parent(&TypeHandle::object()).is_ok());

        let template = builder()
            .build_template(&FactoryConfig::default(), &names(&["a"]), false, None)
            .expect("template");
        assert!(TypeBuilder::validate_parent(&template).is_err());
    }

    #[test]
    fn test_object_parent_is_normalized() {
        let template = builder()
            .build_template(
                &FactoryConfig::default(),
                &names(&["a"]),
                false,
                Some(&TypeHandle::object()),
            )
            .expect("template");
        assert!(template.as_anonymous().and_then(|a| a.parent()).is_none());
    }

    #[test]
    fn test_instantiation_checks() {
        let builder = builder();
        let template = builder
            .build_template(&FactoryConfig::default(), &names(&["a", "b"]), false, None)
            .expect("template");

        let err = builder
            .build_instantiation(&template, &[TypeHandle::int32()])
            .expect_err("arity");
        assert!(matches!(err, Error::ArgumentCount { expected: 2, actual: 1, .. }));

        let err = builder
            .build_instantiation(&template, &[TypeHandle::int32(), template.clone()])
            .expect_err("open argument");
        assert!(err.is_configuration());

        let closed = builder
            .build_instantiation(&template, &[TypeHandle::int32(), TypeHandle::string()])
            .expect("closed");
        let err = builder
            .build_instantiation(&closed, &[TypeHandle::int32(), TypeHandle::string()])
            .expect_err("already closed");
        assert!(err.is_configuration());
    }
}
