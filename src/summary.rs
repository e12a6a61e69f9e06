//! Group-level views over scored buildings (a park, a region, an import batch).

use serde::Serialize;

use crate::scoring::ScoreResult;

/// Roll-up of scores for a group of buildings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub entity_count: usize,
    /// Mean score rounded to one decimal; 0.0 for an empty group.
    pub avg_score: f64,
    pub count_70_plus: usize,
    pub count_50_plus: usize,
}

pub fn summarize<'a, I>(results: I) -> GroupSummary
where
    I: IntoIterator<Item = &'a ScoreResult>,
{
    let scores: Vec<u32> = results.into_iter().map(|r| u32::from(r.score)).collect();
    let n = scores.len();
    let avg_score = if n == 0 {
        0.0
    } else {
        let mean = scores.iter().sum::<u32>() as f64 / n as f64;
        (mean * 10.0).round() / 10.0
    };
    GroupSummary {
        entity_count: n,
        avg_score,
        count_70_plus: scores.iter().filter(|&&s| s >= 70).count(),
        count_50_plus: scores.iter().filter(|&&s| s >= 50).count(),
    }
}

/// Highest score in the group, `None` when the group is empty.
pub fn best_score<'a, I>(results: I) -> Option<u8>
where
    I: IntoIterator<Item = &'a ScoreResult>,
{
    results.into_iter().map(|r| r.score).max()
}

/// Sort by score, highest first. Ties keep their input order.
pub fn rank_by_score<K>(mut scored: Vec<(K, ScoreResult)>) -> Vec<(K, ScoreResult)> {
    scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));
    scored
}

/// First `n` of an already ranked list.
pub fn top_candidates<K: Clone>(ranked: &[(K, ScoreResult)], n: usize) -> Vec<(K, ScoreResult)> {
    ranked.iter().take(n).cloned().collect()
}
