use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{ComparisonRecord, NamedMetric, PairedRow};
use crate::stats::difference_percent;

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Which end of the metric range ranks first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Higher is better (uptake, selectivity, performance score).
    #[default]
    Descending,
    /// Lower is better (ground-state energy).
    Ascending,
}

impl RankOrder {
    /// Total order over metrics with NaN always placed last.
    fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                RankOrder::Descending => b.total_cmp(&a),
                RankOrder::Ascending => a.total_cmp(&b),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Stable sort by metric; ties keep their input order.
pub fn rank(metrics: &[NamedMetric], order: RankOrder) -> Vec<NamedMetric> {
    let mut ranked = metrics.to_vec();
    ranked.sort_by(|a, b| order.compare(a.metric, b.metric));
    ranked
}

/// First `n` entries of an already ranked list.
pub fn top_n(ranked: &[NamedMetric], n: usize) -> &[NamedMetric] {
    &ranked[..n.min(ranked.len())]
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Zip two ranked lists position by position.  The result is as long as the
/// shorter list; `position` starts at 1.
pub fn pair_ranked(existing: &[NamedMetric], ai: &[NamedMetric]) -> Vec<ComparisonRecord> {
    existing
        .iter()
        .zip(ai)
        .enumerate()
        .map(|(i, (e, a))| ComparisonRecord {
            position: i + 1,
            existing_name: e.name.clone(),
            ai_name: a.name.clone(),
            existing_value: e.metric,
            ai_value: a.metric,
            difference_percent: difference_percent(e.metric, a.metric),
        })
        .collect()
}

/// Rank both collections, keep the top `n` of each and pair them.
pub fn compare_top(
    existing: &[NamedMetric],
    ai: &[NamedMetric],
    n: usize,
    order: RankOrder,
) -> Vec<ComparisonRecord> {
    let existing = rank(existing, order);
    let ai = rank(ai, order);
    pair_ranked(top_n(&existing, n), top_n(&ai, n))
}

/// Records for a table that already lines up existing and AI values by name.
pub fn pair_rows(rows: &[PairedRow]) -> Vec<ComparisonRecord> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| ComparisonRecord {
            position: i + 1,
            existing_name: row.name.clone(),
            ai_name: row.name.clone(),
            existing_value: row.existing,
            ai_value: row.ai,
            difference_percent: difference_percent(row.existing, row.ai),
        })
        .collect()
}
