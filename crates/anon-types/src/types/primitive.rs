// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in primitive types.

use super::{TypeDescriptor, TypeHandle};
use std::sync::OnceLock;

/// Primitive type kinds.
///
/// `Object` is the universal top type: every value is assignable to it and
/// it is the declared type of fields whose value was null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Object,
    Boolean,
    Char,
    Int32,
    Int64,
    Double,
    String,
    DateTime,
}

impl PrimitiveKind {
    /// All primitive kinds, in identity order.
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Object,
        Self::Boolean,
        Self::Char,
        Self::Int32,
        Self::Int64,
        Self::Double,
        Self::String,
        Self::DateTime,
    ];

    /// Simple type name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Boolean => "Boolean",
            Self::Char => "Char",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
        }
    }

    /// Namespace-qualified type name.
    #[must_use]
    pub fn full_name(self) -> String {
        format!("System.{}", self.name())
    }

    /// Value-like primitives cannot hold null and cannot be derived from.
    #[must_use]
    pub fn is_value_type(self) -> bool {
        !matches!(self, Self::Object | Self::String)
    }

    fn index(self) -> usize {
        self as usize
    }
}

static PRIMITIVES: OnceLock<Vec<TypeHandle>> = OnceLock::new();

/// Process-wide handle of a primitive type.
pub(super) fn handle(kind: PrimitiveKind) -> TypeHandle {
    let table = PRIMITIVES.get_or_init(|| {
        PrimitiveKind::ALL
            .iter()
            .map(|kind| TypeHandle::new(TypeDescriptor::primitive(*kind)))
            .collect()
    });
    table[kind.index()].clone()
}
