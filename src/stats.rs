use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::model::{ComparisonRecord, IterationPoint, IterationSeries, RawSample};

// ---------------------------------------------------------------------------
// Percentage difference
// ---------------------------------------------------------------------------

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `|existing − ai| / existing × 100`, one decimal.
///
/// An `existing` of zero gives ∞ (or NaN when both are zero); that result is
/// returned unchanged.
pub fn difference_percent(existing: f64, ai: f64) -> f64 {
    round1((existing - ai).abs() / existing * 100.0)
}

/// Half a unit of a whole-percent figure plus half a unit of the one-decimal
/// difference.
pub const PUBLISHED_TOLERANCE: f64 = 0.55;

/// Whether a published whole-percent improvement matches a computed
/// difference in magnitude.
pub fn matches_published(difference_percent: f64, published: f64) -> bool {
    (difference_percent.abs() - published.abs()).abs() <= PUBLISHED_TOLERANCE
}

// ---------------------------------------------------------------------------
// Aggregate summary
// ---------------------------------------------------------------------------

/// Average and range over a set of values, ignoring NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DifferenceSummary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Number of values that took part (NaN excluded).
    pub count: usize,
}

/// Summarize `values`.  With nothing left after dropping NaN the summary is
/// all zeros.
pub fn summarize<I>(values: I) -> DifferenceSummary
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut count = 0usize;

    for v in values.into_iter().filter(|v| !v.is_nan()) {
        sum += v;
        min = min.min(v);
        max = max.max(v);
        count += 1;
    }

    if count == 0 {
        return DifferenceSummary::default();
    }

    DifferenceSummary {
        average: sum / count as f64,
        min,
        max,
        count,
    }
}

pub fn summarize_records(records: &[ComparisonRecord]) -> DifferenceSummary {
    summarize(records.iter().map(|r| r.difference_percent))
}

pub fn summarize_improvements(series: &IterationSeries) -> DifferenceSummary {
    summarize(series.iter().map(|p| p.improvement))
}

// ---------------------------------------------------------------------------
// Iteration series
// ---------------------------------------------------------------------------

/// Samples belonging to one label, in input order.
pub fn label_series(samples: &[RawSample], label: &str) -> Vec<RawSample> {
    samples
        .iter()
        .filter(|s| s.label == label)
        .cloned()
        .collect()
}

/// Label of the first sample, and whether any other label follows it.
pub fn first_label(samples: &[RawSample]) -> Option<(&str, bool)> {
    let first = samples.first()?.label.as_str();
    Some((first, samples.iter().any(|s| s.label != first)))
}

/// Align two series on their shared indices, following the order of
/// `existing`, and keep the first `limit` points.
///
/// Each step appears once: a repeated index in `existing` keeps its first
/// occurrence, a repeated index in `ai` its last.
pub fn iteration_series(existing: &[RawSample], ai: &[RawSample], limit: usize) -> IterationSeries {
    let ai_by_index: BTreeMap<i64, f64> = ai.iter().map(|s| (s.index, s.value)).collect();
    let mut seen = BTreeSet::new();

    let points = existing
        .iter()
        .filter(|e| seen.insert(e.index))
        .filter_map(|e| {
            ai_by_index.get(&e.index).map(|&a| IterationPoint {
                step: e.index,
                existing: e.value,
                ai: a,
                improvement: e.value - a,
            })
        })
        .take(limit)
        .collect();

    IterationSeries { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: i64, value: f64) -> RawSample {
        RawSample {
            label: "m".into(),
            index,
            value,
        }
    }

    #[test]
    fn difference_matches_published_figure() {
        assert_eq!(difference_percent(245.0, 312.0), 27.3);
        assert_eq!(difference_percent(312.0, 245.0), 21.5);
    }

    #[test]
    fn published_figures_match_within_rounding() {
        assert!(matches_published(27.3, 27.0));
        assert!(matches_published(44.9, 45.0));
        assert!(matches_published(-13.4, 13.0));
        assert!(!matches_published(38.6, 36.0));
        assert!(!matches_published(f64::NAN, 27.0));
    }

    #[test]
    fn zero_baseline_is_not_trapped() {
        assert_eq!(difference_percent(0.0, 5.0), f64::INFINITY);
        assert!(difference_percent(0.0, 0.0).is_nan());
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = summarize(Vec::<f64>::new());
        assert_eq!(s, DifferenceSummary { average: 0.0, min: 0.0, max: 0.0, count: 0 });
        assert_eq!(summarize([f64::NAN, f64::NAN]), DifferenceSummary::default());
    }

    #[test]
    fn summary_ignores_nan() {
        let s = summarize([10.0, f64::NAN, 30.0, 20.0]);
        assert_eq!(s.count, 3);
        assert!((s.average - 20.0).abs() < 1e-12);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 30.0);
    }

    #[test]
    fn series_pairs_shared_indices_and_truncates() {
        let existing: Vec<RawSample> = (0..15).map(|i| sample(i, -1.0 - i as f64 * 0.1)).collect();
        let ai: Vec<RawSample> = (0..12)
            .filter(|i| *i != 3)
            .map(|i| sample(i, -1.2 - i as f64 * 0.1))
            .collect();

        let series = iteration_series(&existing, &ai, 10);
        assert_eq!(series.len(), 10);
        let steps: Vec<i64> = series.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 4, 5, 6, 7, 8, 9, 10]);
        for p in series.iter() {
            assert!((p.improvement - 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn improvement_sign_is_not_normalized() {
        let series = iteration_series(&[sample(0, 1.0)], &[sample(0, 3.0)], 10);
        assert_eq!(series.points[0].improvement, -2.0);
        assert_eq!(summarize_improvements(&series).average, -2.0);
    }

    #[test]
    fn repeated_steps_keep_first_occurrence() {
        let mut existing = vec![sample(0, 1.0), sample(1, 0.5)];
        existing.push(RawSample { label: "B".into(), index: 0, value: 9.0 });
        existing.push(RawSample { label: "B".into(), index: 1, value: 8.0 });
        let ai = vec![sample(0, 0.75), sample(1, 0.25)];

        let series = iteration_series(&existing, &ai, 10);
        let steps: Vec<i64> = series.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert_eq!(series.points[1].existing, 0.5);
    }

    #[test]
    fn first_label_reports_mixed_input() {
        assert_eq!(first_label(&[]), None);
        assert_eq!(first_label(&[sample(0, 1.0), sample(1, 2.0)]), Some(("m", false)));
        let mixed = vec![sample(0, 1.0), RawSample { label: "x".into(), index: 0, value: 2.0 }];
        assert_eq!(first_label(&mixed), Some(("m", true)));
    }

    #[test]
    fn label_series_filters_by_label() {
        let mut samples = vec![sample(0, 1.0), sample(1, 2.0)];
        samples.push(RawSample { label: "other".into(), index: 0, value: 9.0 });
        assert_eq!(label_series(&samples, "m").len(), 2);
        assert_eq!(label_series(&samples, "other")[0].value, 9.0);
        assert!(label_series(&samples, "none").is_empty());
    }
}
