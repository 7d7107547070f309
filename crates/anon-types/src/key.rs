// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signatures of generated types and their canonical cache keys.
//!
//! Keys are direct structural strings, not digests. Every name is written
//! with its byte length in front (`<len>:<name>`), so a delimiter inside a
//! name can never shift a field boundary:
//!
//! ```text
//! template      T|m0|p-|n2|1:a|3:b,c
//! template      T|m0|p-|n2|3:a,b|1:c
//! instantiation I|t300|n2|#3|#7
//! ```

use crate::types::TypeId;
use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

/// Canonical cache key of a [`Signature`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Arc<str>);

impl CacheKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything that identifies a generated type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Open template over ordered property names.
    Template {
        names: Vec<Arc<str>>,
        is_mutable: bool,
        /// `None` means `Object`.
        parent: Option<TypeId>,
    },
    /// Template bound to ordered concrete argument types.
    Instantiation {
        template: TypeId,
        arguments: Vec<TypeId>,
    },
}

impl Signature {
    /// Signature of a template.
    pub fn template<I, S>(names: I, is_mutable: bool, parent: Option<TypeId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::Template {
            names: names.into_iter().map(Into::into).collect(),
            is_mutable,
            parent,
        }
    }

    /// Signature of a template instantiation.
    pub fn instantiation(template: TypeId, arguments: impl IntoIterator<Item = TypeId>) -> Self {
        Self::Instantiation {
            template,
            arguments: arguments.into_iter().collect(),
        }
    }

    /// Number of fields (template names or bound arguments).
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Template { names, .. } => names.len(),
            Self::Instantiation { arguments, .. } => arguments.len(),
        }
    }

    /// Encode this signature into its cache key.
    #[must_use]
    pub fn canonical_key(&self) -> CacheKey {
        let mut encoder = KeyEncoder::default();
        match self {
            Self::Template {
                names,
                is_mutable,
                parent,
            } => {
                encoder.tag('T');
                encoder.flag('m', *is_mutable);
                encoder.optional_id('p', *parent);
                encoder.count(names.len());
                for name in names {
                    encoder.name(name);
                }
            }
            Self::Instantiation {
                template,
                arguments,
            } => {
                encoder.tag('I');
                encoder.id('t', *template);
                encoder.count(arguments.len());
                for argument in arguments {
                    encoder.id('#', *argument);
                }
            }
        }
        encoder.finish()
    }
}

/// Appends `|`-separated, self-delimiting components.
#[derive(Default)]
struct KeyEncoder {
    buf: String,
}

impl KeyEncoder {
    fn separator(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push('|');
        }
    }

    fn tag(&mut self, tag: char) {
        self.separator();
        self.buf.push(tag);
    }

    fn flag(&mut self, label: char, value: bool) {
        self.separator();
        self.buf.push(label);
        self.buf.push(if value { '1' } else { '0' });
    }

    fn id(&mut self, label: char, id: TypeId) {
        self.separator();
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}{}", label, id);
    }

    fn optional_id(&mut self, label: char, id: Option<TypeId>) {
        match id {
            Some(id) => self.id(label, id),
            None => {
                self.separator();
                self.buf.push(label);
                self.buf.push('-');
            }
        }
    }

    fn count(&mut self, count: usize) {
        self.separator();
        let _ = write!(self.buf, "n{}", count);
    }

    fn name(&mut self, name: &str) {
        self.separator();
        let _ = write!(self.buf, "{}:{}", name.len(), name);
    }

    fn finish(self) -> CacheKey {
        CacheKey(self.buf.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(names: &[&str]) -> CacheKey {
        Signature::template(names.iter().copied(), false, None).canonical_key()
    }

    #[test]
    fn test_template_key_format() {
        assert_eq!(key(&["a", "b,c"]).as_str(), "T|m0|p-|n2|1:a|3:b,c");
        assert_eq!(key(&[]).as_str(), "T|m0|p-|n0");
    }

    #[test]
    fn test_delimiters_inside_names_do_not_collide() {
        assert_ne!(key(&["a", "b,c"]), key(&["a,b", "c"]));
        assert_ne!(key(&["a|1:b"]), key(&["a", "b"]));
        assert_ne!(key(&["1:a"]), key(&["a"]));
        assert_ne!(key(&["a", ""]), key(&["a"]));
        assert_ne!(key(&["ab"]), key(&["a", "b"]));
    }

    #[test]
    fn test_order_is_significant() {
        assert_ne!(key(&["a", "b"]), key(&["b", "a"]));
    }

    #[test]
    fn test_mutability_and_parent_discriminate() {
        let parent = TypeId::next();
        let plain = Signature::template(["a"], false, None).canonical_key();
        let mutable = Signature::template(["a"], true, None).canonical_key();
        let derived = Signature::template(["a"], false, Some(parent)).canonical_key();
        assert_ne!(plain, mutable);
        assert_ne!(plain, derived);
        assert_ne!(mutable, derived);
    }

    #[test]
    fn test_instantiation_key() {
        let template = TypeId::next();
        let a = TypeId::next();
        let b = TypeId::next();
        let ab = Signature::instantiation(template, [a, b]);
        let ba = Signature::instantiation(template, [b, a]);
        assert_ne!(ab.canonical_key(), ba.canonical_key());
        assert_eq!(ab.arity(), 2);
        assert!(ab.canonical_key().as_str().starts_with("I|t"));
        assert_ne!(
            ab.canonical_key(),
            Signature::template(["a", "b"], false, None).canonical_key()
        );
    }

    #[test]
    fn test_multibyte_names_use_byte_length() {
        assert_eq!(key(&["é"]).as_str(), "T|m0|p-|n1|2:é");
    }
}
