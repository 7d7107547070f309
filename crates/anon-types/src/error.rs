// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared by the factory, the cache and instances.

use thiserror::Error;

/// Failure reported by an [`EmissionBackend`](crate::emit::EmissionBackend)
/// while defining or closing a type.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create a backend error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by type resolution, construction and instance access.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied an unusable type request (parent without a
    /// parameterless constructor, open template used as a closed type, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Two distinct signatures produced the same cache key.
    #[error("Invariant violation: cache key {key} is shared by two distinct signatures")]
    InvariantViolation { key: String },

    /// The emission backend failed; the cache entry was rolled back.
    #[error("Type construction failed: {0}")]
    Construction(#[from] BackendError),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Property is read-only: {0}")]
    ReadOnlyProperty(String),

    #[error("Type mismatch for '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Constructor of {type_name} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Missing value for constructor parameter '{0}'")]
    MissingArgument(String),
}

impl Error {
    /// Returns `true` for [`Error::Configuration`].
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns `true` for [`Error::Construction`].
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_converts_to_construction() {
        let err: Error = BackendError::new("emitter unavailable").into();
        assert!(err.is_construction());
        assert_eq!(
            err.to_string(),
            "Type construction failed: emitter unavailable"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = Error::Configuration("parent has no default constructor".into());
        assert!(err.is_configuration());
        assert!(err.to_string().contains("default constructor"));
    }
}
