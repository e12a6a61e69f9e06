// src/lib.rs
//! Site readiness scoring.
//!
//! Derives a 0..=100 readiness score for a building from its accumulated field
//! notes, and memoizes it in a content-addressed cache so repeated views are
//! cheap while new notes keep arriving.
//!
//! - [`scoring`]: the pure rule engine (`score_building`)
//! - [`cache`]: `ScoreCache` plus the `ScoreStore` persistence seam
//! - [`notes`]: the `NoteSource` seam that supplies current note texts
//! - [`summary`]: group roll-ups (averages, best score, ranking)

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod notes;
pub mod scoring;
pub mod summary;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::cache::{
    CacheOutcome, CacheRecord, JsonFileStore, MemoryStore, ScoreCache, ScoreStore, WarmReport,
    CURRENT_VERSION,
};
pub use crate::error::{ScoreError, StoreError};
pub use crate::notes::{NoteBook, NoteSource, Observation};
pub use crate::scoring::{score_building, Confidence, RuleEngine, ScoreResult, Scorer};
