//! Note-text collaborator: where the current notes for a building come from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;

/// Supplies every current note text for an entity.
///
/// Each call must return one consistent snapshot (one query / one transaction),
/// since the fingerprint and the score are both derived from it.
pub trait NoteSource: Send + Sync {
    fn note_texts(&self, entity_id: i64) -> Result<Vec<Option<String>>, StoreError>;
}

/// A single field observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub observer: Option<String>,
    pub note_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(observer: Option<&str>, note_text: Option<&str>) -> Self {
        Self {
            observer: observer.map(str::to_string),
            note_text: note_text.map(str::to_string),
            created_at: Utc::now(),
        }
    }
}

/// In-memory observation log keyed by entity id.
#[derive(Debug, Default)]
pub struct NoteBook {
    inner: RwLock<HashMap<i64, Vec<Observation>>>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, entity_id: i64, observer: Option<&str>, note_text: Option<&str>) {
        self.push(entity_id, Observation::new(observer, note_text));
    }

    pub fn push(&self, entity_id: i64, obs: Observation) {
        if let Ok(mut map) = self.inner.write() {
            map.entry(entity_id).or_default().push(obs);
        }
    }

    /// Bulk import: append many observations under one lock.
    pub fn extend<I>(&self, entity_id: i64, items: I)
    where
        I: IntoIterator<Item = Observation>,
    {
        if let Ok(mut map) = self.inner.write() {
            map.entry(entity_id).or_default().extend(items);
        }
    }

    pub fn remove_entity(&self, entity_id: i64) -> Option<Vec<Observation>> {
        self.inner.write().ok()?.remove(&entity_id)
    }

    /// Entity ids in ascending order.
    pub fn entity_ids(&self) -> Vec<i64> {
        let mut ids = self
            .inner
            .read()
            .map(|m| m.keys().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn observations(&self, entity_id: i64) -> Vec<Observation> {
        self.inner
            .read()
            .ok()
            .and_then(|m| m.get(&entity_id).cloned())
            .unwrap_or_default()
    }
}

impl NoteSource for NoteBook {
    fn note_texts(&self, entity_id: i64) -> Result<Vec<Option<String>>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("note book lock poisoned".into()))?;
        Ok(map
            .get(&entity_id)
            .map(|obs| obs.iter().map(|o| o.note_text.clone()).collect())
            .unwrap_or_default())
    }
}
