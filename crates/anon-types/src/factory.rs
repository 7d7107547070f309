// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Public entry points: types from names and types, templates from names,
//! objects from names and values.

use crate::builder::TypeBuilder;
use crate::cache::TypeCache;
use crate::config::FactoryConfig;
use crate::emit::{EmissionBackend, SchemaBackend};
use crate::error::{Error, Result};
use crate::field_map::FieldMap;
use crate::generic::GenericTemplate;
use crate::instance::Instance;
use crate::key::Signature;
use crate::types::TypeHandle;
use crate::value::Value;
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Mutability and parent of a requested type.
#[derive(Debug, Clone, Default)]
pub struct TypeOptions {
    /// Generate public setters.
    pub is_mutable: bool,
    /// Host class to derive from (`None` means `Object`).
    pub parent: Option<TypeHandle>,
}

impl TypeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mutable(mut self, is_mutable: bool) -> Self {
        self.is_mutable = is_mutable;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: &TypeHandle) -> Self {
        self.parent = Some(parent.clone());
        self
    }
}

/// Structural type factory.
///
/// Owns one [`TypeCache`] and one [`TypeBuilder`]; every generated type is
/// built at most once per factory and lives as long as the factory.
///
/// ```
/// use anon_types::{FieldMap, TypeFactory, TypeOptions, Value};
///
/// let factory = TypeFactory::new();
/// let row = factory.create_object(
///     FieldMap::new().with("b", Value::from("test")).with("a", Value::I32(1)),
///     None,
/// )?;
/// assert_eq!(row.to_string(), "{ b = test, a = 1 }");
/// # Ok::<(), anon_types::Error>(())
/// ```
pub struct TypeFactory {
    config: ArcSwap<FactoryConfig>,
    cache: TypeCache,
    builder: TypeBuilder,
}

impl TypeFactory {
    /// Factory with the default configuration and [`SchemaBackend`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: FactoryConfig) -> Self {
        Self::with_backend(config, Arc::new(SchemaBackend::new()))
    }

    /// Factory emitting through a custom backend.
    pub fn with_backend(config: FactoryConfig, backend: Arc<dyn EmissionBackend>) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            cache: TypeCache::new(),
            builder: TypeBuilder::new(backend),
        }
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<FactoryConfig> {
        self.config.load_full()
    }

    /// Replace the configuration. Types already built keep their names.
    pub fn set_config(&self, config: FactoryConfig) {
        self.config.store(Arc::new(config));
    }

    #[must_use]
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    #[must_use]
    pub fn builder(&self) -> &TypeBuilder {
        &self.builder
    }

    /// Closed type with the given properties, in order.
    ///
    /// Resolves the template for (names, mutability, parent) and binds the
    /// field types into it; both steps are cached.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] for an invalid parent or an open field type,
    /// [`Error::Construction`] if the backend fails.
    pub fn create_type(
        &self,
        fields: &FieldMap<TypeHandle>,
        options: &TypeOptions,
    ) -> Result<TypeHandle> {
        let names: Vec<Arc<str>> = fields.names().cloned().collect();
        let template = self.template_for(names, options.is_mutable, options.parent.as_ref())?;
        let arguments: Vec<TypeHandle> = fields.values().cloned().collect();
        self.instantiate(&template, &arguments)
    }

    /// Open template over `names`.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] for a repeated name or an invalid parent,
    /// [`Error::Construction`] if the backend fails.
    pub fn create_generic_type_definition<I, S>(
        &self,
        names: I,
        options: &TypeOptions,
    ) -> Result<GenericTemplate>
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let names: Vec<Arc<str>> = names.into_iter().map(Into::into).collect();
        {
            let mut seen = HashSet::with_capacity(names.len());
            if let Some(duplicate) = names.iter().find(|name| !seen.insert(&***name)) {
                return Err(Error::Configuration(format!(
                    "property '{}' is declared more than once",
                    duplicate
                )));
            }
        }
        self.template_for(names, options.is_mutable, options.parent.as_ref())
    }

    /// Bind `arguments` into `template`, in property order.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentCount`] on an arity mismatch,
    /// [`Error::Configuration`] if an argument is open,
    /// [`Error::Construction`] if the backend fails.
    pub fn instantiate(
        &self,
        template: &GenericTemplate,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle> {
        let signature = Signature::instantiation(
            template.handle().id(),
            arguments.iter().map(TypeHandle::id),
        );
        self.cache.get_or_try_build(&signature, || {
            self.builder.build_instantiation(template.handle(), arguments)
        })
    }

    /// Build an instance from ordered values.
    ///
    /// Without `existing`, the type is resolved from the runtime type of
    /// each value (`Object` for null). With `existing`, values are bound by
    /// name into that type's constructor.
    ///
    /// # Errors
    ///
    /// - [`Error::PropertyNotFound`] if a value names no property of
    ///   `existing`
    /// - [`Error::MissingArgument`] if a constructor parameter has no value
    /// - [`Error::Configuration`] if `existing` is not a closed generated type
    /// - [`Error::TypeMismatch`] if a value does not fit its parameter
    pub fn create_object(
        &self,
        values: FieldMap<Value>,
        existing: Option<&TypeHandle>,
    ) -> Result<Instance> {
        match existing {
            Some(ty) => Self::bind_existing(ty, &values),
            None => {
                let fields: FieldMap<TypeHandle> = values
                    .iter()
                    .map(|(name, value)| {
                        (name, value.runtime_type().unwrap_or_else(TypeHandle::object))
                    })
                    .collect();
                let ty = self.create_type(&fields, &TypeOptions::default())?;
                Instance::construct(&ty, values.into_iter().map(|(_, value)| value).collect())
            }
        }
    }

    fn template_for(
        &self,
        names: Vec<Arc<str>>,
        is_mutable: bool,
        parent: Option<&TypeHandle>,
    ) -> Result<GenericTemplate> {
        let parent = TypeBuilder::normalize_parent(parent);
        let signature =
            Signature::template(names.iter().cloned(), is_mutable, parent.map(TypeHandle::id));
        let config = self.config.load();
        let ty = self.cache.get_or_try_build(&signature, || {
            self.builder.build_template(&config, &names, is_mutable, parent)
        })?;
        GenericTemplate::from_type(ty)
    }

    fn bind_existing(ty: &TypeHandle, values: &FieldMap<Value>) -> Result<Instance> {
        if !ty.is_anonymous() || ty.is_generic_type_definition() {
            return Err(Error::Configuration(format!(
                "'{}' is not a closed generated type",
                ty
            )));
        }
        if let Some((name, _)) = values.iter().find(|(name, _)| ty.property(name).is_none()) {
            return Err(Error::PropertyNotFound(format!("{}.{}", ty, name)));
        }

        let arguments = ty
            .constructors()
            .first()
            .map(|constructor| constructor.parameters())
            .unwrap_or_default()
            .iter()
            .map(|parameter| {
                values
                    .get(parameter.name())
                    .cloned()
                    .ok_or_else(|| Error::MissingArgument(parameter.name().to_string()))
            })
            .collect::<Result<Vec<Value>>>()?;

        log::trace!("[TypeFactory] binding {} values into {}", arguments.len(), ty);
        Instance::construct(ty, arguments)
    }
}

impl Default for TypeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeFactory")
            .field("config", &*self.config.load())
            .field("cached_types", &self.cache.len())
            .finish_non_exhaustive()
    }
}

static GLOBAL_FACTORY: OnceLock<TypeFactory> = OnceLock::new();

/// Process-wide factory used by the free functions.
pub fn global() -> &'static TypeFactory {
    GLOBAL_FACTORY.get_or_init(|| {
        log::debug!("[TypeFactory] initializing process-wide factory");
        TypeFactory::new()
    })
}

/// [`TypeFactory::create_type`] on the process-wide factory.
///
/// # Errors
///
/// See [`TypeFactory::create_type`].
pub fn create_type(fields: &FieldMap<TypeHandle>, options: &TypeOptions) -> Result<TypeHandle> {
    global().create_type(fields, options)
}

/// [`TypeFactory::create_generic_type_definition`] on the process-wide
/// factory.
///
/// # Errors
///
/// See [`TypeFactory::create_generic_type_definition`].
pub fn create_generic_type_definition<I, S>(
    names: I,
    options: &TypeOptions,
) -> Result<GenericTemplate>
where
    I: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
{
    global().create_generic_type_definition(names, options)
}

/// [`TypeFactory::instantiate`] on the process-wide factory.
///
/// # Errors
///
/// See [`TypeFactory::instantiate`].
pub fn instantiate(template: &GenericTemplate, arguments: &[TypeHandle]) -> Result<TypeHandle> {
    global().instantiate(template, arguments)
}

/// [`TypeFactory::create_object`] on the process-wide factory.
///
/// # Errors
///
/// See [`TypeFactory::create_object`].
pub fn create_object(values: FieldMap<Value>, existing: Option<&TypeHandle>) -> Result<Instance> {
    global().create_object(values, existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[(&str, TypeHandle)]) -> FieldMap<TypeHandle> {
        list.iter().map(|(name, ty)| (*name, ty.clone())).collect()
    }

    #[test]
    fn test_templates_shared_across_field_types() {
        let factory = TypeFactory::new();
        let ints = factory
            .create_type(&fields(&[("a", TypeHandle::int32())]), &TypeOptions::default())
            .expect("ints");
        let strings = factory
            .create_type(&fields(&[("a", TypeHandle::string())]), &TypeOptions::default())
            .expect("strings");
        assert_ne!(ints, strings);
        assert_eq!(ints.generic_type_definition(), strings.generic_type_definition());
        assert_eq!(factory.builder().templates_built(), 1);
        assert_eq!(factory.cache().len(), 3);
    }

    #[test]
    fn test_config_swap_affects_new_types_only() {
        let factory = TypeFactory::new();
        let before = factory
            .create_type(&fields(&[("a", TypeHandle::int32())]), &TypeOptions::default())
            .expect("before");
        factory.set_config(FactoryConfig::default().with_type_name_prefix("<>f__Row"));
        let after = factory
            .create_type(&fields(&[("b", TypeHandle::int32())]), &TypeOptions::default())
            .expect("after");
        assert!(before.name().starts_with("<>f__LatticeUtilsAnonymousType"));
        assert!(after.name().starts_with("<>f__Row"));
        assert_eq!(factory.config().type_name_prefix, "<>f__Row");
    }

    #[test]
    fn test_object_parent_shares_root_template() {
        let factory = TypeFactory::new();
        let plain = factory
            .create_generic_type_definition(["a"], &TypeOptions::default())
            .expect("plain");
        let explicit = factory
            .create_generic_type_definition(
                ["a"],
                &TypeOptions::new().with_parent(&TypeHandle::object()),
            )
            .expect("explicit");
        assert_eq!(plain, explicit);
    }

    #[test]
    fn test_duplicate_template_names() {
        let err = TypeFactory::new()
            .create_generic_type_definition(["a", "b", "a"], &TypeOptions::default())
            .expect_err("duplicate");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_bind_existing_by_name() {
        let factory = TypeFactory::new();
        let ty = factory
            .create_type(
                &fields(&[("b", TypeHandle::string()), ("a", TypeHandle::int32())]),
                &TypeOptions::default(),
            )
            .expect("type");

        let reordered = FieldMap::new()
            .with("a", Value::I32(1))
            .with("b", Value::from("test"));
        let instance = factory.create_object(reordered, Some(&ty)).expect("bound");
        assert_eq!(instance.to_string(), "{ b = test, a = 1 }");

        let missing = FieldMap::new().with("a", Value::I32(1));
        assert!(matches!(
            factory.create_object(missing, Some(&ty)),
            Err(Error::MissingArgument(name)) if name == "b"
        ));

        let unknown = FieldMap::new()
            .with("a", Value::I32(1))
            .with("b", Value::from("x"))
            .with("c", Value::I32(2));
        assert!(matches!(
            factory.create_object(unknown, Some(&ty)),
            Err(Error::PropertyNotFound(_))
        ));
    }

    #[test]
    fn test_bind_into_template_fails() {
        let factory = TypeFactory::new();
        let template = factory
            .create_generic_type_definition(["a"], &TypeOptions::default())
            .expect("template");
        let err = factory
            .create_object(FieldMap::new().with("a", Value::I32(1)), Some(template.handle()))
            .expect_err("open template");
        assert!(err.is_configuration());
    }
}
