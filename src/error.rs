//! Error types for the persistence collaborators and the score cache.

use std::io;
use thiserror::Error;

/// Failure reported by a `ScoreStore` or `NoteSource` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Backend refused or could not serve the request (lock poisoned, connection lost, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by `ScoreCache`.
///
/// Scoring itself never fails; only the collaborators around it can.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The cache record could not be read or written.
    #[error("cache storage unavailable during {op}: {source}")]
    StorageUnavailable {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// The note texts for an entity could not be fetched.
    #[error("notes unavailable for entity {entity_id}: {source}")]
    NotesUnavailable {
        entity_id: i64,
        #[source]
        source: StoreError,
    },
}

impl ScoreError {
    pub fn is_storage(&self) -> bool {
        matches!(self, ScoreError::StorageUnavailable { .. })
    }
}
