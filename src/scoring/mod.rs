// src/scoring/mod.rs
//! Readiness scoring: turns a building's free-text field notes into a 0..=100
//! score, a coarse confidence level, and the list of rules that fired.
//!
//! Pure and deterministic. No I/O, no shared mutable state, safe to call from
//! any number of threads.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a readiness score.
pub const MAX_SCORE: u32 = 100;
/// Drivers kept in a result (first N fired rules in table order).
pub const MAX_DRIVERS: usize = 5;
/// The single driver reported when there is nothing to score.
pub const EMPTY_DRIVER: &str = "No observation text yet.";

/// Coarse confidence derived from how many independent rules fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// 0-1 fired rules → low, 2-3 → medium, 4+ → high.
    pub fn from_hits(hits: usize) -> Self {
        match hits {
            0 | 1 => Confidence::Low,
            2 | 3 => Confidence::Medium,
            _ => Confidence::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub confidence: Confidence,
    /// `"+<points>: <label>"` per fired rule, table order, at most `MAX_DRIVERS`.
    #[serde(default)]
    pub drivers: Vec<String>,
}

impl ScoreResult {
    /// Result for a building with no usable note text.
    pub fn empty() -> Self {
        Self {
            score: 0,
            confidence: Confidence::Low,
            drivers: vec![EMPTY_DRIVER.to_string()],
        }
    }

    /// Drivers as one cell, e.g. for a CSV export column.
    pub fn drivers_line(&self) -> String {
        self.drivers.join("; ")
    }

    /// Shape check applied to results decoded from storage.
    pub fn is_well_formed(&self) -> bool {
        u32::from(self.score) <= MAX_SCORE && self.drivers.len() <= MAX_DRIVERS
    }
}

/// Score a set of notes. `None` and empty entries are ignored.
pub fn score_building<'a, I>(texts: I) -> ScoreResult
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let text = texts
        .into_iter()
        .flatten()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    if text.trim().is_empty() {
        return ScoreResult::empty();
    }

    let mut raw: u32 = 0;
    let mut drivers: Vec<String> = Vec::new();

    for rule in rules::compiled() {
        if rule.fires(&text) {
            raw += rule.spec.points;
            drivers.push(format!("+{}: {}", rule.spec.points, rule.spec.label));
        }
    }

    // Confidence counts every fired rule, including those cut from `drivers`.
    let hits = drivers.len();
    drivers.truncate(MAX_DRIVERS);

    ScoreResult {
        score: raw.min(MAX_SCORE) as u8,
        confidence: Confidence::from_hits(hits),
        drivers,
    }
}

/// Seam between the cache and the scoring function.
pub trait Scorer: Send + Sync {
    fn score(&self, texts: &[Option<String>]) -> ScoreResult;
}

/// Production scorer backed by the static rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl Scorer for RuleEngine {
    fn score(&self, texts: &[Option<String>]) -> ScoreResult {
        score_building(texts.iter().map(Option::as_deref))
    }
}
