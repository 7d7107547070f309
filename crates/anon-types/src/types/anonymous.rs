// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptors of generated structural types.

use super::{MemberDescriptor, TypeHandle};
use std::collections::HashMap;
use std::sync::Arc;

/// A property of a generated type.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: Arc<str>,
    property_type: TypeHandle,
    position: usize,
    can_write: bool,
    hides_inherited: bool,
}

impl PropertyDescriptor {
    /// Create a property descriptor.
    pub fn new(
        name: impl Into<Arc<str>>,
        property_type: TypeHandle,
        position: usize,
        can_write: bool,
    ) -> Self {
        Self {
            name: name.into(),
            property_type,
            position,
            can_write,
            hides_inherited: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Declared type (a generic parameter on templates).
    #[must_use]
    pub fn property_type(&self) -> &TypeHandle {
        &self.property_type
    }

    /// Constructor position, also the hashing and rendering order.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read accessors are always public.
    #[must_use]
    pub fn can_read(&self) -> bool {
        true
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.can_write
    }

    /// Check if this property hides an inherited member of the same name.
    #[must_use]
    pub fn hides_inherited(&self) -> bool {
        self.hides_inherited
    }
}

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    name: Arc<str>,
    parameter_type: TypeHandle,
    position: usize,
}

impl ParameterDescriptor {
    /// Create a parameter descriptor.
    pub fn new(name: impl Into<Arc<str>>, parameter_type: TypeHandle, position: usize) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            position,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameter_type(&self) -> &TypeHandle {
        &self.parameter_type
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A public constructor.
#[derive(Debug, Clone, Default)]
pub struct ConstructorDescriptor {
    parameters: Vec<ParameterDescriptor>,
}

impl ConstructorDescriptor {
    /// Create a constructor with the given parameters.
    #[must_use]
    pub fn new(parameters: Vec<ParameterDescriptor>) -> Self {
        Self { parameters }
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Check if this constructor takes no parameters.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// Generic shape of a generated type.
#[derive(Debug, Clone)]
pub enum GenericShape {
    /// Open template; properties are typed by these parameters.
    Definition { parameters: Vec<TypeHandle> },
    /// Closed type bound from `definition`.
    Instance {
        definition: TypeHandle,
        arguments: Vec<TypeHandle>,
    },
}

/// A member inherited from a host class, with the class declaring it.
#[derive(Debug, Clone)]
pub struct InheritedMember {
    owner: TypeHandle,
    member: MemberDescriptor,
}

impl InheritedMember {
    /// Class declaring the member.
    #[must_use]
    pub fn owner(&self) -> &TypeHandle {
        &self.owner
    }

    #[must_use]
    pub fn member(&self) -> &MemberDescriptor {
        &self.member
    }
}

/// Layout and contract of a generated type.
#[derive(Debug)]
pub struct AnonymousDescriptor {
    properties: Vec<PropertyDescriptor>,
    by_name: HashMap<Arc<str>, usize>,
    constructor: ConstructorDescriptor,
    parent: Option<TypeHandle>,
    inherited: Vec<InheritedMember>,
    is_mutable: bool,
    shape: GenericShape,
}

impl AnonymousDescriptor {
    /// Create a generated type layout.
    ///
    /// Properties are ordered by position; the single constructor takes one
    /// parameter per property, named after it. Properties whose name matches
    /// an inherited member are flagged as hiding it.
    pub fn new(
        mut properties: Vec<PropertyDescriptor>,
        parent: Option<TypeHandle>,
        is_mutable: bool,
        shape: GenericShape,
    ) -> Self {
        properties.sort_by_key(PropertyDescriptor::position);
        let inherited = parent.as_ref().map(collect_inherited).unwrap_or_default();

        for property in &mut properties {
            property.hides_inherited = inherited
                .iter()
                .any(|m| m.member.name() == property.name());
        }

        let by_name = properties
            .iter()
            .enumerate()
            .map(|(index, p)| (Arc::clone(&p.name), index))
            .collect();
        let constructor = ConstructorDescriptor::new(
            properties
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    ParameterDescriptor::new(Arc::clone(&p.name), p.property_type.clone(), index)
                })
                .collect(),
        );

        Self {
            properties,
            by_name,
            constructor,
            parent,
            inherited,
            is_mutable,
            shape,
        }
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|index| &self.properties[*index])
    }

    /// Slot index of a declared property.
    #[must_use]
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn constructor(&self) -> &ConstructorDescriptor {
        &self.constructor
    }

    /// Declared parent (`None` means `Object`).
    #[must_use]
    pub fn parent(&self) -> Option<&TypeHandle> {
        self.parent.as_ref()
    }

    /// Members inherited from the parent chain, base-first.
    #[must_use]
    pub fn inherited(&self) -> &[InheritedMember] {
        &self.inherited
    }

    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.is_mutable
    }

    #[must_use]
    pub fn shape(&self) -> &GenericShape {
        &self.shape
    }

    /// Number of properties.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.properties.len()
    }
}

fn collect_inherited(parent: &TypeHandle) -> Vec<InheritedMember> {
    let mut chain = Vec::new();
    let mut current = Some(parent.clone());
    while let Some(ty) = current {
        current = ty.as_class().and_then(|class| class.base().cloned());
        chain.push(ty);
    }

    chain
        .iter()
        .rev()
        .filter_map(|ty| ty.as_class().map(|class| (ty, class)))
        .flat_map(|(ty, class)| {
            class.members().iter().map(move |member| InheritedMember {
                owner: ty.clone(),
                member: member.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassBuilder, TypeDescriptor};
    use crate::value::Value;

    fn closed(properties: Vec<PropertyDescriptor>, parent: Option<TypeHandle>) -> AnonymousDescriptor {
        let definition = TypeHandle::new(TypeDescriptor::generic_parameter("unused", 0));
        AnonymousDescriptor::new(
            properties,
            parent,
            false,
            GenericShape::Instance {
                definition,
                arguments: Vec::new(),
            },
        )
    }

    #[test]
    fn test_properties_sorted_by_position() {
        let desc = closed(
            vec![
                PropertyDescriptor::new("a", TypeHandle::int32(), 1, false),
                PropertyDescriptor::new("b", TypeHandle::string(), 0, false),
            ],
            None,
        );
        let names: Vec<&str> = desc.properties().iter().map(PropertyDescriptor::name).collect();
        assert_eq!(names, vec!["b", "a"]);

        let params: Vec<&str> = desc
            .constructor()
            .parameters()
            .iter()
            .map(ParameterDescriptor::name)
            .collect();
        assert_eq!(params, vec!["b", "a"]);
        assert_eq!(desc.property_index("a"), Some(1));
    }

    #[test]
    fn test_inherited_members_base_first() {
        let grand = ClassBuilder::new("Grand")
            .member("Level", TypeHandle::int32(), Value::I32(1))
            .build()
            .expect("grand");
        let parent = ClassBuilder::new("Parent")
            .base(&grand)
            .member("Value", TypeHandle::int32(), Value::I32(2))
            .build()
            .expect("parent");

        let desc = closed(
            vec![PropertyDescriptor::new("Value", TypeHandle::int32(), 0, false)],
            Some(parent.clone()),
        );

        let inherited: Vec<&str> = desc.inherited().iter().map(|m| m.member().name()).collect();
        assert_eq!(inherited, vec!["Level", "Value"]);
        assert_eq!(desc.inherited()[0].owner(), &grand);
        assert!(desc.properties()[0].hides_inherited());
    }
}
