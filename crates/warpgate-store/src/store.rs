//! The shared warp registry.
//!
//! [`LocationStore`] maps `(scope, folded name)` to a [`NamedLocation`].
//! All access goes through one [`RwLock`]: mutations are exclusive with
//! each other and with readers, and every read returns owned clones so no
//! caller ever aliases a stored record.
//!
//! The store does no I/O. Hosts that want durability watch
//! [`LocationStore::revision`] and write a [`snapshot`](LocationStore::snapshot)
//! when it changes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use warpgate_types::{NamedLocation, Position, ScopeKey, ScopeMode};

use crate::error::StoreError;
use crate::name::{fold, validate_name};
use crate::scope::ScopeResolver;

type EntryKey = (ScopeKey, String);

#[derive(Debug, Default)]
struct StoreInner {
    entries: BTreeMap<EntryKey, NamedLocation>,
    revision: u64,
}

impl StoreInner {
    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Outcome of [`LocationStore::create_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    /// The name was free and the new warp was stored.
    Created(NamedLocation),
    /// A warp already holds the name; nothing was changed.
    Occupied(NamedLocation),
}

/// Lock-guarded registry of named locations.
#[derive(Debug)]
pub struct LocationStore {
    resolver: ScopeResolver,
    inner: RwLock<StoreInner>,
}

impl LocationStore {
    /// Create an empty registry in the given mode.
    pub fn new(mode: ScopeMode) -> Self {
        Self {
            resolver: ScopeResolver::new(mode),
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Create a registry pre-populated from previously saved records.
    ///
    /// Records are re-keyed for `mode`, so a snapshot written in one mode
    /// can be loaded in the other. Records whose names no longer validate
    /// are kept, since they were accepted when created. Later duplicates
    /// replace earlier ones.
    pub fn restore(mode: ScopeMode, records: Vec<NamedLocation>) -> Self {
        let store = Self::new(mode);
        {
            let mut inner = store.inner.write();
            for mut record in records {
                let scope = store.resolver.for_position(&record.position);
                record.world_name = scope.world_name().map(str::to_owned);
                inner.entries.insert((scope, fold(&record.name)), record);
            }
            debug!(count = inner.entries.len(), "Restored warp registry");
        }
        store
    }

    /// The registry's scope mode.
    pub const fn mode(&self) -> ScopeMode {
        self.resolver.mode()
    }

    /// The resolver matching this registry's mode.
    pub const fn resolver(&self) -> ScopeResolver {
        self.resolver
    }

    /// Look up a warp by exact, case-insensitive name.
    ///
    /// In global mode the scope argument is ignored.
    pub fn get(&self, scope: &ScopeKey, name: &str) -> Option<NamedLocation> {
        let key = (self.resolver.normalize(scope), fold(name));
        self.inner.read().entries.get(&key).cloned()
    }

    /// Create a warp at `position`, replacing any warp with the same name in
    /// the same scope.
    ///
    /// Overwrite confirmation is the caller's job; this call never refuses
    /// an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if `name` fails validation.
    pub fn create(
        &self,
        name: &str,
        position: Position,
        creator: Option<&str>,
    ) -> Result<NamedLocation, StoreError> {
        let (scope, record) = self.record(name, position, creator)?;
        let mut inner = self.inner.write();
        let replaced = inner
            .entries
            .insert((scope.clone(), fold(name)), record.clone())
            .is_some();
        inner.bump();
        debug!(name, %scope, replaced, revision = inner.revision, "Stored warp");
        Ok(record)
    }

    /// Create a warp only if no warp with the same name exists in the same
    /// scope. The check and the insert happen under one write lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidName`] if `name` fails validation.
    pub fn create_if_absent(
        &self,
        name: &str,
        position: Position,
        creator: Option<&str>,
    ) -> Result<Insertion, StoreError> {
        let (scope, record) = self.record(name, position, creator)?;

        let mut inner = self.inner.write();
        match inner.entries.entry((scope.clone(), fold(name))) {
            Entry::Occupied(existing) => return Ok(Insertion::Occupied(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
        }
        inner.bump();
        debug!(name, %scope, revision = inner.revision, "Stored new warp");
        Ok(Insertion::Created(record))
    }

    fn record(
        &self,
        name: &str,
        position: Position,
        creator: Option<&str>,
    ) -> Result<(ScopeKey, NamedLocation), StoreError> {
        validate_name(name)?;
        let scope = self.resolver.for_position(&position);
        let record = NamedLocation {
            name: name.to_owned(),
            world_name: scope.world_name().map(str::to_owned),
            position,
            creator_name: creator.map(str::to_owned),
            created_at: Utc::now(),
        };
        Ok((scope, record))
    }

    /// Delete a warp. Returns `true` if an entry existed.
    pub fn remove(&self, scope: &ScopeKey, name: &str) -> bool {
        let key = (self.resolver.normalize(scope), fold(name));
        let mut inner = self.inner.write();
        let removed = inner.entries.remove(&key).is_some();
        if removed {
            inner.bump();
            debug!(name, scope = %key.0, revision = inner.revision, "Removed warp");
        }
        removed
    }

    /// All warps, ordered by scope then folded name.
    pub fn list(&self) -> Vec<NamedLocation> {
        self.inner.read().entries.values().cloned().collect()
    }

    /// Number of stored warps.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    /// Consistent copy of the registry together with its revision.
    pub fn snapshot(&self) -> (u64, Vec<NamedLocation>) {
        let inner = self.inner.read();
        (inner.revision, inner.entries.values().cloned().collect())
    }
}
