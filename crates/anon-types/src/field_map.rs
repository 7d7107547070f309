// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Insertion-ordered name/value input.
//!
//! Declaration order of generated properties is the order in which fields
//! were supplied, so the factory takes an explicit ordered sequence instead
//! of a hash map. Re-inserting a name keeps its original position and
//! replaces the value.

use indexmap::IndexMap;
use std::sync::Arc;

/// Ordered map from field name to `V`.
#[derive(Debug, Clone)]
pub struct FieldMap<V> {
    entries: IndexMap<Arc<str>, V>,
}

impl<V> FieldMap<V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create an empty map with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a field, returning the previous value for that name.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, value: V) -> Option<V> {
        self.entries.insert(name.into(), value)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<Arc<str>>, value: V) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Position of a field in declaration order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<Arc<str>>, V> FromIterator<(K, V)> for FieldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<V> IntoIterator for FieldMap<V> {
    type Item = (Arc<str>, V);
    type IntoIter = indexmap::map::IntoIter<Arc<str>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let map: FieldMap<i32> = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(map.position("a"), Some(1));
    }

    #[test]
    fn test_duplicate_overwrites_in_place() {
        let mut map = FieldMap::new().with("x", 1).with("y", 2);
        assert_eq!(map.insert("x", 10), Some(1));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x"), Some(&10));
        assert_eq!(map.names().next().map(|n| &**n), Some("x"));
    }

    #[test]
    fn test_empty() {
        let map: FieldMap<()> = FieldMap::default();
        assert!(map.is_empty());
        assert!(!map.contains("a"));
    }
}
