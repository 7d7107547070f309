// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # anon-types - structural types built at runtime
//!
//! Given ordered named fields, the factory produces a type exposing those
//! fields as properties, with value-based equality, a field-wise hash code
//! and `{ name = value, ... }` rendering, optionally derived from a host
//! class. The object factory resolves the type from runtime values and
//! builds a populated instance in one step.
//!
//! ## Quick Start
//!
//! ```rust
//! use anon_types::{create_object, FieldMap, Value};
//!
//! let fields = || FieldMap::new().with("b", Value::from("test")).with("a", Value::I32(1));
//! let a = create_object(fields(), None)?;
//! let b = create_object(fields(), None)?;
//!
//! assert_eq!(a, b);
//! assert_eq!(a.hash_code(), b.hash_code());
//! assert_eq!(a.type_handle(), b.type_handle());
//! assert_eq!(a.to_string(), "{ b = test, a = 1 }");
//! assert_eq!(a.get("a")?, Value::I32(1));
//! # Ok::<(), anon_types::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! create_object(values) -> infer field types (null -> Object)
//!        |
//! create_type(fields)   -> template_for(names, mutability, parent)
//!        |                        |  TypeCache: Signature -> CacheKey
//!        |                        |  miss -> TypeBuilder -> EmissionBackend
//!        v                        v
//! instantiate(template, field types)  (cached under template + arguments)
//!        |
//! Instance::construct(closed type, values)
//! ```
//!
//! ## Modules Overview
//!
//! - [`factory`] - `TypeFactory` and the process-wide free functions
//! - [`types`] - type descriptors, handles and host classes
//! - [`cache`] - at-most-once type construction
//! - [`key`] - collision-free cache keys
//! - [`emit`] - emission backends

pub mod builder;
pub mod cache;
pub mod config;
pub mod emit;
mod error;
pub mod factory;
mod field_map;
pub mod generic;
mod instance;
pub mod key;
pub mod types;
mod value;

pub use builder::TypeBuilder;
pub use cache::{CacheStats, KeyState, TypeCache};
pub use config::FactoryConfig;
pub use emit::{EmissionBackend, SchemaBackend, TemplateRequest};
pub use error::{BackendError, Error, Result};
pub use factory::{
    create_generic_type_definition, create_object, create_type, instantiate, TypeFactory,
    TypeOptions,
};
pub use field_map::FieldMap;
pub use generic::GenericTemplate;
pub use instance::{BaseView, Instance};
pub use key::{CacheKey, Signature};
pub use types::{ClassBuilder, PrimitiveKind, TypeHandle, TypeId};
pub use value::{ObjectRef, Value};
