// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent memo of generated types.
//!
//! The TypeCache ensures that each distinct [`Signature`] is built at most
//! once per process. Lookups of already-built types are lock-free reads on a
//! dashmap; construction is serialized behind a single build lock, so a
//! caller racing another caller on the same key waits and then observes the
//! type the first one stored. Entries are never evicted.
//!
//! Per key: `Absent -> Building -> Present`, or `Building -> Absent` when the
//! build fails (nothing is stored, the next call retries).

use crate::error::{Error, Result};
use crate::key::{CacheKey, Signature};
use crate::types::TypeHandle;
use dashmap::{DashMap, DashSet};
use parking_lot::{Mutex, RwLock};
use std::time::Instant;

/// Lifecycle state of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Absent,
    Building,
    Present,
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    /// Successful builds.
    pub misses: u64,
    /// Builds that failed and were rolled back.
    pub failures: u64,
    pub last_build_ns: u64,
}

struct CacheEntry {
    signature: Signature,
    ty: TypeHandle,
}

/// Marks a key as `Building` for the lifetime of the guard.
struct BuildingGuard<'a> {
    building: &'a DashSet<CacheKey>,
    key: CacheKey,
}

impl<'a> BuildingGuard<'a> {
    fn new(building: &'a DashSet<CacheKey>, key: CacheKey) -> Self {
        building.insert(key.clone());
        Self { building, key }
    }
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) {
        self.building.remove(&self.key);
    }
}

/// Process-lifetime cache of generated types keyed by signature.
pub struct TypeCache {
    entries: DashMap<CacheKey, CacheEntry>,
    building: DashSet<CacheKey>,
    build_lock: Mutex<()>,
    stats: RwLock<CacheStats>,
}

impl TypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            building: DashSet::new(),
            build_lock: Mutex::new(()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Return the type cached for `signature`, building it with `build` on
    /// first use.
    ///
    /// `build` runs under the build lock and must not call back into this
    /// cache.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns (nothing is cached in that case), or
    /// [`Error::InvariantViolation`] if the key is already bound to a
    /// different signature.
    pub fn get_or_try_build<F>(&self, signature: &Signature, build: F) -> Result<TypeHandle>
    where
        F: FnOnce() -> Result<TypeHandle>,
    {
        let key = signature.canonical_key();

        if let Some(hit) = self.try_peek(&key, signature)? {
            self.record_hit(&key);
            return Ok(hit);
        }

        let _lock = self.build_lock.lock();
        if let Some(hit) = self.try_peek(&key, signature)? {
            self.record_hit(&key);
            return Ok(hit);
        }

        let _building = BuildingGuard::new(&self.building, key.clone());
        let start = Instant::now();
        match build() {
            Ok(ty) => {
                self.entries.insert(
                    key.clone(),
                    CacheEntry {
                        signature: signature.clone(),
                        ty: ty.clone(),
                    },
                );
                let elapsed = self.record_miss(start);
                log::debug!("[TypeCache] built {} for key {} in {}ns", ty, key, elapsed);
                Ok(ty)
            }
            Err(err) => {
                self.record_failure();
                log::warn!("[TypeCache] build failed for key {}, rolled back: {}", key, err);
                Err(err)
            }
        }
    }

    /// Cached type for `signature`, without building.
    #[must_use]
    pub fn get(&self, signature: &Signature) -> Option<TypeHandle> {
        let key = signature.canonical_key();
        let entry = self.entries.get(&key)?;
        (entry.signature == *signature).then(|| entry.ty.clone())
    }

    /// Current lifecycle state of `signature`'s key.
    #[must_use]
    pub fn state(&self, signature: &Signature) -> KeyState {
        let key = signature.canonical_key();
        if self.entries.contains_key(&key) {
            KeyState::Present
        } else if self.building.contains(&key) {
            KeyState::Building
        } else {
            KeyState::Absent
        }
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        *self.stats.read()
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every cached type, in no particular order.
    #[must_use]
    pub fn types(&self) -> Vec<TypeHandle> {
        self.entries.iter().map(|entry| entry.ty.clone()).collect()
    }

    fn try_peek(&self, key: &CacheKey, signature: &Signature) -> Result<Option<TypeHandle>> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        if entry.signature != *signature {
            log::error!(
                "[TypeCache] key collision on {}: cached {:?}, requested {:?}",
                key,
                entry.signature,
                signature
            );
            return Err(Error::InvariantViolation {
                key: key.to_string(),
            });
        }
        Ok(Some(entry.ty.clone()))
    }

    fn record_hit(&self, key: &CacheKey) {
        log::trace!("[TypeCache] hit {}", key);
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) -> u64 {
        let elapsed = start.elapsed().as_nanos() as u64;
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_build_ns = elapsed;
        elapsed
    }

    fn record_failure(&self) {
        let mut stats = self.stats.write();
        stats.failures = stats.failures.saturating_add(1);
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}
