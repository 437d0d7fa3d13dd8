//! In-memory store implementations.
//!
//! HashMap-based stores behind the same traits as the real clients,
//! including the registry's conditional-put contract. Intended for tests
//! and embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::LiveRecord;

use super::{LiveRegistry, ObjectStore, PutOutcome, StoreError};

/// In-memory object store keyed by object key.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryObjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a stored object by key.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.objects.read().expect("lock poisoned").get(key).cloned()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let map = self.objects.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_immutable(
        &self,
        key: &str,
        body: &serde_json::Value,
    ) -> Result<PutOutcome, StoreError> {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), body.clone());
        Ok(PutOutcome::Written)
    }
}

/// In-memory live registry keyed by (partition key, sort key).
#[derive(Default)]
pub struct InMemoryLiveRegistry {
    records: RwLock<HashMap<(String, String), LiveRecord>>,
}

impl InMemoryLiveRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the live record at a partition key.
    pub fn get(&self, pk: &str) -> Option<LiveRecord> {
        self.records
            .read()
            .expect("lock poisoned")
            .get(&(pk.to_string(), crate::domain::LIVE_SK.to_string()))
            .cloned()
    }

    /// All partition keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let map = self.records.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().map(|(pk, _)| pk.clone()).collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl LiveRegistry for InMemoryLiveRegistry {
    async fn put_live(
        &self,
        record: &LiveRecord,
        guard_version: bool,
    ) -> Result<PutOutcome, StoreError> {
        let key = (record.pk()?, record.sk().to_string());
        let mut records = self.records.write().expect("lock poisoned");

        // Same condition the registry service evaluates:
        // attribute_not_exists(version) OR version <= :new
        if guard_version {
            if let (Some(new_version), Some(existing)) = (record.version(), records.get(&key)) {
                if existing.version().map_or(false, |v| v > new_version) {
                    return Ok(PutOutcome::Skipped);
                }
            }
        }

        records.insert(key, record.clone());
        Ok(PutOutcome::Written)
    }
}
