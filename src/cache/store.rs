// src/cache/store.rs
//! Persistence seam for cached scores.
//!
//! A store keeps at most one `CacheRecord` per `(entity_id, version)`; `upsert`
//! replaces the existing record for that key in place. Enforcing the uniqueness
//! is the store's job, so it holds across processes sharing one backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;

/// Persisted memo of the last computed score for one entity under one scorer version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub entity_id: i64,
    pub version: String,
    /// SHA-256 hex of the normalized notes that produced `payload`.
    pub input_fingerprint: String,
    /// JSON-encoded `ScoreResult`.
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

/// Lookup-by-key plus upsert. Implementations must be shareable across threads.
pub trait ScoreStore: Send + Sync {
    fn find(&self, entity_id: i64, version: &str) -> Result<Option<CacheRecord>, StoreError>;
    fn upsert(&self, record: CacheRecord) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for std::sync::Arc<S> {
    fn find(&self, entity_id: i64, version: &str) -> Result<Option<CacheRecord>, StoreError> {
        (**self).find(entity_id, version)
    }
    fn upsert(&self, record: CacheRecord) -> Result<(), StoreError> {
        (**self).upsert(record)
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn find(&self, entity_id: i64, version: &str) -> Result<Option<CacheRecord>, StoreError> {
        (**self).find(entity_id, version)
    }
    fn upsert(&self, record: CacheRecord) -> Result<(), StoreError> {
        (**self).upsert(record)
    }
}

type Key = (i64, String);

/// In-process store. Good for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<Key, CacheRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all entities and versions.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone of the record for a key, bypassing the `Result` plumbing.
    pub fn get(&self, entity_id: i64, version: &str) -> Option<CacheRecord> {
        self.inner
            .read()
            .ok()?
            .get(&(entity_id, version.to_string()))
            .cloned()
    }

    /// Overwrite the stored payload for a key. Returns false if there is no record.
    pub fn tamper_payload(&self, entity_id: i64, version: &str, payload: &str) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        match map.get_mut(&(entity_id, version.to_string())) {
            Some(rec) => {
                rec.payload = payload.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop every version's record for an entity.
    pub fn remove_entity(&self, entity_id: i64) -> usize {
        let Ok(mut map) = self.inner.write() else {
            return 0;
        };
        let before = map.len();
        map.retain(|(id, _), _| *id != entity_id);
        before - map.len()
    }
}

impl ScoreStore for MemoryStore {
    fn find(&self, entity_id: i64, version: &str) -> Result<Option<CacheRecord>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(map.get(&(entity_id, version.to_string())).cloned())
    }

    fn upsert(&self, record: CacheRecord) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        map.insert((record.entity_id, record.version.clone()), record);
        Ok(())
    }
}
