// src/cache/file_store.rs
//! File-backed score store: one JSON document per `(entity_id, version)`.
//!
//! Layout: `<dir>/<entity_id>__<version>.json`. The path *is* the key, so two
//! writers for the same key can only replace each other's file, never duplicate it.
//! Writes go to a temp file first and are renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::store::{CacheRecord, ScoreStore};
use crate::error::StoreError;

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, entity_id: i64, version: &str) -> PathBuf {
        self.dir
            .join(format!("{}__{}.json", entity_id, encode_version(version)))
    }

    /// Delete every version's record for an entity. Returns how many files went away.
    pub fn remove_entity(&self, entity_id: i64) -> Result<usize, StoreError> {
        let prefix = format!("{}__", entity_id);
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(".json") {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl ScoreStore for JsonFileStore {
    fn find(&self, entity_id: i64, version: &str) -> Result<Option<CacheRecord>, StoreError> {
        let path = self.record_path(entity_id, version);
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<CacheRecord>(&raw) {
            Ok(rec) if rec.entity_id == entity_id && rec.version == version => Ok(Some(rec)),
            Ok(_) => {
                tracing::warn!(entity_id, version, path = %path.display(), "score record key mismatch; ignoring");
                Ok(None)
            }
            Err(e) => {
                // Unreadable record: the next upsert replaces it.
                tracing::warn!(entity_id, version, error = %e, "unreadable score record; ignoring");
                Ok(None)
            }
        }
    }

    fn upsert(&self, record: CacheRecord) -> Result<(), StoreError> {
        let path = self.record_path(record.entity_id, &record.version);
        let json = serde_json::to_vec_pretty(&record)?;

        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq));
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&json)?;
            f.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Filename-safe, injective encoding of a version tag.
fn encode_version(version: &str) -> String {
    let mut out = String::with_capacity(version.len());
    for b in version.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(entity_id: i64, version: &str, fp: &str) -> CacheRecord {
        CacheRecord {
            entity_id,
            version: version.into(),
            input_fingerprint: fp.into(),
            payload: r#"{"score":0,"confidence":"low","drivers":[]}"#.into(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn version_encoding_is_filename_safe() {
        assert_eq!(encode_version("v1"), "v1");
        assert_eq!(encode_version("v1/beta"), "v1%2Fbeta");
        assert_ne!(encode_version("v/1"), encode_version("v_1"));
    }

    #[test]
    fn upsert_then_find_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path().join("scores")).unwrap();
        assert!(store.find(7, "v1").unwrap().is_none());

        store.upsert(record(7, "v1", "aa")).unwrap();
        store.upsert(record(7, "v1", "bb")).unwrap();
        let got = store.find(7, "v1").unwrap().unwrap();
        assert_eq!(got.input_fingerprint, "bb");

        let files = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(files, 1, "one file per key, no stray temp files");
    }

    #[test]
    fn garbage_file_reads_as_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        fs::write(store.record_path(3, "v1"), "{not json").unwrap();
        assert!(store.find(3, "v1").unwrap().is_none());
    }

    #[test]
    fn remove_entity_drops_all_versions_only_for_that_entity() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        store.upsert(record(1, "v1", "a")).unwrap();
        store.upsert(record(1, "v2", "a")).unwrap();
        store.upsert(record(11, "v1", "a")).unwrap();
        assert_eq!(store.remove_entity(1).unwrap(), 2);
        assert!(store.find(11, "v1").unwrap().is_some());
    }
}
