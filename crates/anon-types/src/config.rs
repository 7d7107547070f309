// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factory configuration.
//!
//! - **Level 1 (Static)**: constants of the structural contract (hash
//!   multiplier and seed, default naming).
//! - **Level 2 (Dynamic)**: [`FactoryConfig`], held by each
//!   [`TypeFactory`](crate::TypeFactory) behind an `ArcSwap` so it can be
//!   replaced at runtime without blocking readers.
//!
//! # Example
//!
//! ```
//! use anon_types::config::FactoryConfig;
//! use anon_types::TypeFactory;
//!
//! let factory = TypeFactory::with_config(
//!     FactoryConfig::default().with_type_name_prefix("<>f__ReportRow"),
//! );
//! assert_eq!(factory.config().type_name_prefix, "<>f__ReportRow");
//! ```

// =======================================================================
// Structural contract
// =======================================================================

/// Multiplier of the field-wise hash accumulator.
///
/// `hash = hash * HASH_MULTIPLIER + field_hash`, wrapping, fields in
/// declaration order.
pub const HASH_MULTIPLIER: i32 = -1_521_134_295;

/// Initial accumulator value of the field-wise hash.
pub const HASH_SEED: i32 = 0;

// =======================================================================
// Naming
// =======================================================================

/// Prefix of generated type names (`<prefix><index>` + "`" + `<arity>`).
pub const DEFAULT_TYPE_NAME_PREFIX: &str = "<>f__LatticeUtilsAnonymousType";

/// Suffix of generic parameter names (`<{property}>` + suffix).
pub const DEFAULT_GENERIC_PARAMETER_SUFFIX: &str = "j__TPar";

/// Runtime configuration of a [`TypeFactory`](crate::TypeFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Prefix of generated type names.
    pub type_name_prefix: String,
    /// Suffix of generated generic parameter names.
    pub generic_parameter_suffix: String,
}

impl FactoryConfig {
    /// Set the generated type name prefix.
    #[must_use]
    pub fn with_type_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_name_prefix = prefix.into();
        self
    }

    /// Set the generic parameter name suffix.
    #[must_use]
    pub fn with_generic_parameter_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.generic_parameter_suffix = suffix.into();
        self
    }

    /// Name of the template built with the given index and arity.
    #[must_use]
    pub fn type_name(&self, index: usize, arity: usize) -> String {
        format!("{}{}`{}", self.type_name_prefix, index, arity)
    }

    /// Name of the generic parameter bound to a property.
    #[must_use]
    pub fn generic_parameter_name(&self, property: &str) -> String {
        format!("<{}>{}", property, self.generic_parameter_suffix)
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            type_name_prefix: DEFAULT_TYPE_NAME_PREFIX.to_string(),
            generic_parameter_suffix: DEFAULT_GENERIC_PARAMETER_SUFFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = FactoryConfig::default();
        assert_eq!(config.type_name(0, 2), "<>f__LatticeUtilsAnonymousType0`2");
        assert_eq!(config.generic_parameter_name("a"), "<a>j__TPar");
    }

    #[test]
    fn test_builder_overrides() {
        let config = FactoryConfig::default()
            .with_type_name_prefix("Row")
            .with_generic_parameter_suffix("T");
        assert_eq!(config.type_name(7, 1), "Row7`1");
        assert_eq!(config.generic_parameter_name("x"), "<x>T");
    }

    #[test]
    fn test_hash_multiplier_is_odd() {
        assert_eq!(HASH_MULTIPLIER & 1, 1);
    }
}
