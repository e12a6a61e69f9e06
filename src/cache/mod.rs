// src/cache/mod.rs
//! Content-addressed score cache.
//!
//! A cached score stays valid exactly as long as the building's notes do: the
//! record stores a fingerprint of the notes it was computed from, and a lookup
//! reuses it only when the fingerprint of the *current* notes matches. There is
//! no TTL and no explicit invalidation call.
//!
//! Flow per lookup:
//! 1) fingerprint the current notes
//! 2) `find(entity_id, version)`
//! 3) fingerprint match + decodable payload → hit, no write
//! 4) otherwise score, `upsert` once, return the fresh result
//!
//! `CURRENT_VERSION` partitions the cache by rule set. Records written under an
//! older tag are never matched again; they are orphaned, not deleted.
//!
//! Concurrent lookups for one stale key may both recompute and both upsert.
//! Both write the same deterministic result, so the last writer wins harmlessly.

pub mod file_store;
pub mod fingerprint;
pub mod store;

use chrono::Utc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::ScoreError;
use crate::metrics;
use crate::notes::NoteSource;
use crate::scoring::{RuleEngine, ScoreResult, Scorer};

pub use file_store::JsonFileStore;
pub use fingerprint::fingerprint;
pub use store::{CacheRecord, MemoryStore, ScoreStore};

/// Scorer version tag. Bump whenever rule weights, patterns, confidence
/// thresholds or the score cap change.
pub const CURRENT_VERSION: &str = "v1";

/// How a lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Record found with a matching fingerprint.
    Hit,
    /// No record for `(entity_id, version)` yet.
    Miss,
    /// Record found but the notes changed since it was written.
    Stale,
    /// Record found with a matching fingerprint but an undecodable payload.
    Corrupt,
}

impl CacheOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, CacheOutcome::Hit)
    }

    fn miss_reason(self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "absent",
            CacheOutcome::Stale => "stale",
            CacheOutcome::Corrupt => "corrupt",
        }
    }
}

/// Tally of a best-effort warm-up run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmReport {
    pub hits: usize,
    pub computed: usize,
    pub failed: usize,
}

pub struct ScoreCache<S: ScoreStore, E: Scorer = RuleEngine> {
    store: S,
    scorer: E,
    version: String,
}

impl<S: ScoreStore> ScoreCache<S, RuleEngine> {
    pub fn new(store: S) -> Self {
        Self::with_scorer(store, RuleEngine)
    }
}

impl<S: ScoreStore, E: Scorer> ScoreCache<S, E> {
    pub fn with_scorer(store: S, scorer: E) -> Self {
        metrics::ensure_metrics_described();
        Self {
            store,
            scorer,
            version: CURRENT_VERSION.to_string(),
        }
    }

    /// Same cache over another version tag.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scorer(&self) -> &E {
        &self.scorer
    }

    /// Authoritative lookup: storage errors propagate.
    pub fn get_or_compute(
        &self,
        entity_id: i64,
        texts: &[Option<String>],
    ) -> Result<ScoreResult, ScoreError> {
        self.get_or_compute_traced(entity_id, texts)
            .map(|(result, _)| result)
    }

    /// Like `get_or_compute`, also reporting how the lookup was served.
    pub fn get_or_compute_traced(
        &self,
        entity_id: i64,
        texts: &[Option<String>],
    ) -> Result<(ScoreResult, CacheOutcome), ScoreError> {
        let fp = fingerprint(texts.iter().map(Option::as_deref));

        let existing = self
            .store
            .find(entity_id, &self.version)
            .map_err(|source| ScoreError::StorageUnavailable {
                op: "find",
                source,
            })?;

        let outcome = match existing {
            None => CacheOutcome::Miss,
            Some(rec) if rec.input_fingerprint != fp => CacheOutcome::Stale,
            Some(rec) => match decode_payload(&rec.payload) {
                Some(cached) => {
                    metrics::record_hit();
                    debug!(
                        entity_id,
                        version = %self.version,
                        fp = fingerprint::short(&fp),
                        "score cache hit"
                    );
                    return Ok((cached, CacheOutcome::Hit));
                }
                None => {
                    warn!(entity_id, version = %self.version, "undecodable cached score; recomputing");
                    CacheOutcome::Corrupt
                }
            },
        };

        metrics::record_miss(outcome.miss_reason());
        debug!(
            entity_id,
            version = %self.version,
            fp = fingerprint::short(&fp),
            reason = outcome.miss_reason(),
            "score cache miss"
        );

        let started = Instant::now();
        let fresh = self.scorer.score(texts);
        metrics::record_compute_ms(started.elapsed().as_secs_f64() * 1000.0);

        let payload = serde_json::to_string(&fresh).map_err(|e| {
            ScoreError::StorageUnavailable {
                op: "encode",
                source: e.into(),
            }
        })?;

        let record = CacheRecord {
            entity_id,
            version: self.version.clone(),
            input_fingerprint: fp,
            payload,
            updated_at: Utc::now(),
        };
        if let Err(source) = self.store.upsert(record) {
            metrics::record_write_failure();
            return Err(ScoreError::StorageUnavailable {
                op: "upsert",
                source,
            });
        }

        Ok((fresh, outcome))
    }

    /// Fetch the entity's current notes, then look up / compute its score.
    pub fn get_or_compute_building_score<N>(
        &self,
        notes: &N,
        entity_id: i64,
    ) -> Result<ScoreResult, ScoreError>
    where
        N: NoteSource + ?Sized,
    {
        let texts = notes
            .note_texts(entity_id)
            .map_err(|source| ScoreError::NotesUnavailable { entity_id, source })?;
        self.get_or_compute(entity_id, &texts)
    }

    /// Best-effort warm-up (e.g. after a bulk import). Never fails: errors are
    /// logged, counted, and skipped so the surrounding operation carries on.
    pub fn warm_best_effort<N, I>(&self, notes: &N, entity_ids: I) -> WarmReport
    where
        N: NoteSource + ?Sized,
        I: IntoIterator<Item = i64>,
    {
        let mut report = WarmReport::default();
        for entity_id in entity_ids {
            let texts = match notes.note_texts(entity_id) {
                Ok(t) => t,
                Err(e) => {
                    metrics::record_warm_failure();
                    warn!(entity_id, error = %e, "warm-up skipped: notes unavailable");
                    report.failed += 1;
                    continue;
                }
            };
            match self.get_or_compute_traced(entity_id, &texts) {
                Ok((_, CacheOutcome::Hit)) => report.hits += 1,
                Ok(_) => report.computed += 1,
                Err(e) => {
                    metrics::record_warm_failure();
                    warn!(entity_id, error = %e, "warm-up skipped: score cache write failed");
                    report.failed += 1;
                }
            }
        }
        debug!(
            hits = report.hits,
            computed = report.computed,
            failed = report.failed,
            "score cache warm-up done"
        );
        report
    }
}

/// Decode a stored payload; malformed or out-of-range payloads read as `None`.
fn decode_payload(payload: &str) -> Option<ScoreResult> {
    serde_json::from_str::<ScoreResult>(payload)
        .ok()
        .filter(ScoreResult::is_well_formed)
}
