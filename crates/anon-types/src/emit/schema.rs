// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default backend: generated types are runtime schemas interpreted by
//! [`Instance`](crate::Instance).

use super::{EmissionBackend, TemplateRequest};
use crate::error::BackendError;
use crate::types::{
    AnonymousDescriptor, GenericShape, PropertyDescriptor, TypeDescriptor, TypeHandle,
};

/// Schema-based [`EmissionBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaBackend;

impl SchemaBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EmissionBackend for SchemaBackend {
    fn define_template(&self, request: &TemplateRequest<'_>) -> Result<TypeDescriptor, BackendError> {
        if request.parameter_names.len() != request.property_names.len() {
            return Err(BackendError::new(format!(
                "template {} has {} properties but {} type parameters",
                request.name,
                request.property_names.len(),
                request.parameter_names.len()
            )));
        }

        let parameters: Vec<TypeHandle> = request
            .parameter_names
            .iter()
            .enumerate()
            .map(|(position, name)| {
                TypeHandle::new(TypeDescriptor::generic_parameter(name.as_str(), position))
            })
            .collect();

        let properties = request
            .property_names
            .iter()
            .zip(&parameters)
            .enumerate()
            .map(|(position, (name, parameter))| {
                PropertyDescriptor::new(name.clone(), parameter.clone(), position, request.is_mutable)
            })
            .collect();

        let layout = AnonymousDescriptor::new(
            properties,
            request.parent.cloned(),
            request.is_mutable,
            GenericShape::Definition { parameters },
        );
        Ok(TypeDescriptor::anonymous(request.name, layout))
    }

    fn close_template(
        &self,
        template: &TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeDescriptor, BackendError> {
        let Some(open) = template.as_anonymous() else {
            return Err(BackendError::new(format!("{} is not a generated template", template)));
        };
        if open.arity() != arguments.len() {
            return Err(BackendError::new(format!(
                "{} takes {} type arguments, got {}",
                template,
                open.arity(),
                arguments.len()
            )));
        }

        let properties = open
            .properties()
            .iter()
            .zip(arguments)
            .map(|(property, argument)| {
                PropertyDescriptor::new(
                    property.name_arc().clone(),
                    argument.clone(),
                    property.position(),
                    property.can_write(),
                )
            })
            .collect();

        let layout = AnonymousDescriptor::new(
            properties,
            open.parent().cloned(),
            open.is_mutable(),
            GenericShape::Instance {
                definition: template.clone(),
                arguments: arguments.to_vec(),
            },
        );
        Ok(TypeDescriptor::anonymous(template.name(), layout))
    }
}
