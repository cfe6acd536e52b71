//! End-to-end preparation: text in, chart-ready records and summary out.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::loader::parse_csv_text;
use crate::data::model::{ComparisonRecord, CsvRow, IterationSeries, RawSample};
use crate::data::normalize::{to_named_metrics, to_paired_rows};
use crate::data::ranking::{compare_top, pair_rows};
use crate::data::tuple::{parse_tuple_text, TupleParse};
use crate::state::{ChartData, ChartState};
use crate::stats::{
    first_label, iteration_series, label_series, matches_published, summarize_improvements,
    summarize_records, DifferenceSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedComparison {
    pub records: Vec<ComparisonRecord>,
    pub summary: DifferenceSummary,
    /// Published improvement figures next to the computed ones, for tables
    /// that carry them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub published: Vec<PublishedCheck>,
}

/// A published improvement figure checked against the computed difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedCheck {
    pub position: usize,
    pub name: String,
    pub published_percent: f64,
    pub difference_percent: f64,
    /// Magnitudes agree within rounding of the published figure.
    pub agrees: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedSeries {
    pub series: IterationSeries,
    pub summary: DifferenceSummary,
    /// Malformed lines dropped from the existing / AI input.
    pub rejected_existing: usize,
    pub rejected_ai: usize,
}

impl PreparedComparison {
    pub fn into_chart(self) -> ChartState {
        ChartState::new(ChartData::Comparison(self.records), self.summary)
    }
}

impl PreparedSeries {
    pub fn into_chart(self) -> ChartState {
        ChartState::new(ChartData::Series(self.series), self.summary)
    }
}

// ---------------------------------------------------------------------------
// Ranked comparison
// ---------------------------------------------------------------------------

/// Rank two tables independently and pair their top entries.
pub fn prepare_comparison(
    existing_text: &str,
    ai_text: &str,
    config: &PipelineConfig,
) -> Result<PreparedComparison> {
    let existing = parse_csv_text(existing_text).context("parsing existing-MOF table")?;
    let ai = parse_csv_text(ai_text).context("parsing AI-MOF table")?;
    Ok(compare_tables(&existing, &ai, config))
}

pub fn compare_tables(
    existing_rows: &[CsvRow],
    ai_rows: &[CsvRow],
    config: &PipelineConfig,
) -> PreparedComparison {
    let existing = to_named_metrics(existing_rows, &config.existing);
    let ai = to_named_metrics(ai_rows, &config.ai);

    let records = compare_top(&existing, &ai, config.top_n, config.order);
    let summary = summarize_records(&records);
    log::info!(
        "Paired top {} of {} existing / {} AI structures into {} records",
        config.top_n,
        existing.len(),
        ai.len(),
        records.len()
    );

    PreparedComparison {
        records,
        summary,
        published: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Pre-paired table
// ---------------------------------------------------------------------------

/// Build records from a table that already pairs values by name.
pub fn prepare_paired(text: &str, config: &PipelineConfig) -> Result<PreparedComparison> {
    let rows = parse_csv_text(text).context("parsing paired table")?;
    Ok(paired_table(&rows, config))
}

pub fn paired_table(rows: &[CsvRow], config: &PipelineConfig) -> PreparedComparison {
    let paired = to_paired_rows(rows, &config.paired);
    let records = pair_rows(&paired);
    let summary = summarize_records(&records);

    let published: Vec<PublishedCheck> = paired
        .iter()
        .zip(&records)
        .filter_map(|(row, rec)| {
            let published_percent = row.published_improvement?;
            Some(PublishedCheck {
                position: rec.position,
                name: row.name.clone(),
                published_percent,
                difference_percent: rec.difference_percent,
                agrees: matches_published(rec.difference_percent, published_percent),
            })
        })
        .collect();
    for check in published.iter().filter(|c| !c.agrees) {
        log::warn!(
            "{}: published improvement {}% disagrees with computed {}%",
            check.name,
            check.published_percent,
            check.difference_percent
        );
    }
    log::info!("Prepared {} paired records", records.len());

    PreparedComparison {
        records,
        summary,
        published,
    }
}

// ---------------------------------------------------------------------------
// Iteration series
// ---------------------------------------------------------------------------

/// Align two tuple-encoded convergence runs.
pub fn prepare_series(existing_text: &str, ai_text: &str, config: &PipelineConfig) -> PreparedSeries {
    align_series(parse_tuple_text(existing_text), parse_tuple_text(ai_text), config)
}

pub fn align_series(existing: TupleParse, ai: TupleParse, config: &PipelineConfig) -> PreparedSeries {
    let existing_samples = pick_series(&existing, config.existing_label.as_deref(), "existing");
    let ai_samples = pick_series(&ai, config.ai_label.as_deref(), "AI");

    let series = iteration_series(&existing_samples, &ai_samples, config.iteration_limit);
    let summary = summarize_improvements(&series);

    let rejected_existing = existing.rejected.len();
    let rejected_ai = ai.rejected.len();
    if rejected_existing + rejected_ai > 0 {
        log::warn!(
            "Dropped malformed series lines: {rejected_existing} existing, {rejected_ai} AI"
        );
    }
    log::info!(
        "Aligned {} / {} samples into {} iteration points",
        existing_samples.len(),
        ai_samples.len(),
        series.len()
    );

    PreparedSeries {
        series,
        summary,
        rejected_existing,
        rejected_ai,
    }
}

/// Samples of the configured label, or of the first label in the input when
/// none is configured.
fn pick_series(parsed: &TupleParse, label: Option<&str>, side: &str) -> Vec<RawSample> {
    if let Some(label) = label {
        return label_series(&parsed.samples, label);
    }
    match first_label(&parsed.samples) {
        Some((first, true)) => {
            log::warn!("{side} series holds several labels; using '{first}'");
            label_series(&parsed.samples, first)
        }
        _ => parsed.samples.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ranking::RankOrder;
    use crate::samples;
    use crate::state::ViewMode;

    const EXISTING: &str = "name,uptake\nMOF-5,245\nHKUST-1,198\nZIF-8,167\nUiO-66,220\n";
    const AI: &str = "name,uptake\nMOF-5,312\nHKUST-1,287\nZIF-8,210\nUiO-66,305\n";

    fn four_row_config() -> PipelineConfig {
        PipelineConfig {
            top_n: 4,
            existing: crate::data::normalize::ColumnSpec::new("name", "uptake"),
            ai: crate::data::normalize::ColumnSpec::new("name", "uptake"),
            ..Default::default()
        }
    }

    #[test]
    fn four_row_sample_end_to_end() {
        let prepared = prepare_comparison(EXISTING, AI, &four_row_config()).unwrap();

        let diffs: Vec<f64> = prepared.records.iter().map(|r| r.difference_percent).collect();
        assert_eq!(diffs, vec![27.3, 38.6, 44.9, 25.7]);
        let names: Vec<&str> = prepared.records.iter().map(|r| r.existing_name.as_str()).collect();
        assert_eq!(names, vec!["MOF-5", "UiO-66", "HKUST-1", "ZIF-8"]);

        let s = prepared.summary;
        assert_eq!(s.count, 4);
        assert!((s.average - 34.125).abs() < 1e-9);
        assert_eq!(s.min, 25.7);
        assert_eq!(s.max, 44.9);
    }

    #[test]
    fn empty_tables_give_zero_summary() {
        let prepared = prepare_comparison("name,uptake", "", &four_row_config()).unwrap();
        assert!(prepared.records.is_empty());
        assert_eq!(prepared.summary, DifferenceSummary::default());
    }

    #[test]
    fn embedded_screening_tables() {
        let prepared = prepare_comparison(
            samples::EXISTING_MOFS,
            samples::GENERATED_MOFS,
            &PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(prepared.records.len(), 5);
        let first = &prepared.records[0];
        assert_eq!((first.existing_name.as_str(), first.ai_name.as_str()), ("MIL-101", "GEN-MOF-4"));
        assert_eq!(first.difference_percent, 28.1);
        // MOF-5 and CPO-27-Mg tie on uptake; input order decides.
        assert_eq!(prepared.records[1].existing_name, "MOF-5");
        assert_eq!(prepared.records[2].existing_name, "CPO-27-Mg");
    }

    #[test]
    fn ascending_order_ranks_energies() {
        let config = PipelineConfig {
            top_n: 2,
            order: RankOrder::Ascending,
            existing: crate::data::normalize::ColumnSpec::new("name", "Ground_State_Energy"),
            ai: crate::data::normalize::ColumnSpec::new("mof_id", "predicted_ground_state_energy"),
            ..Default::default()
        };
        let prepared =
            prepare_comparison(samples::EXISTING_MOFS, samples::GENERATED_MOFS, &config).unwrap();
        assert_eq!(prepared.records[0].existing_name, "MIL-101");
        assert_eq!(prepared.records[0].ai_name, "GEN-MOF-4");
        assert_eq!(prepared.records[1].existing_name, "CPO-27-Mg");
        assert_eq!(prepared.records[1].ai_name, "GEN-MOF-2");
    }

    #[test]
    fn paired_carbon_capture_table() {
        let prepared = prepare_paired(samples::CARBON_CAPTURE, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.records.len(), 5);
        assert_eq!(prepared.records[0].difference_percent, 27.3);
        assert_eq!(prepared.records[4].existing_name, "MIL-101");

        let rows = prepared.into_chart().rows();
        assert_eq!(rows[0].key, "MOF-5");
        assert_eq!(rows[0].ai, Some(312.0));
    }

    #[test]
    fn published_improvements_are_carried() {
        let prepared = prepare_paired(samples::CARBON_CAPTURE, &PipelineConfig::default()).unwrap();
        let published: Vec<f64> = prepared.published.iter().map(|c| c.published_percent).collect();
        assert_eq!(published, vec![27.0, 45.0, 26.0, 39.0, 28.0]);
        assert!(prepared.published.iter().all(|c| c.agrees));
        assert_eq!(prepared.published[1].name, "HKUST-1");
        assert_eq!(prepared.published[1].difference_percent, 44.9);

        let json = serde_json::to_value(&prepared).unwrap();
        assert_eq!(json["published"][0]["publishedPercent"], 27.0);
        assert_eq!(json["published"][0]["agrees"], true);
    }

    #[test]
    fn disagreeing_published_figure_is_flagged() {
        let text = "name,existing,ai,improvement\nMOF-5,245,312,27%\nZIF-8,167,210,40%\nUiO-66,220,305,\n";
        let prepared = prepare_paired(text, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.records.len(), 3);
        assert_eq!(prepared.published.len(), 2);
        assert!(prepared.published[0].agrees);
        assert!(!prepared.published[1].agrees);
        assert_eq!(prepared.published[1].position, 2);
    }

    #[test]
    fn ranked_comparison_has_no_published_figures() {
        let prepared = prepare_comparison(EXISTING, AI, &four_row_config()).unwrap();
        assert!(prepared.published.is_empty());
        let json = serde_json::to_value(&prepared).unwrap();
        assert!(json.get("published").is_none());
    }

    #[test]
    fn negative_baselines_give_negative_percentages() {
        let prepared =
            prepare_paired(samples::GROUND_STATE_ENERGY, &PipelineConfig::default()).unwrap();
        assert_eq!(prepared.records[0].existing_name, "MOF-5");
        assert_eq!(prepared.records[0].difference_percent, -13.4);
        assert!(prepared.summary.max < 0.0);
        assert!(prepared.published.iter().all(|c| c.agrees));
    }

    #[test]
    fn embedded_series_truncate_to_limit() {
        let prepared = prepare_series(
            samples::VQE_EXISTING_SERIES,
            samples::VQE_GENERATED_SERIES,
            &PipelineConfig::default(),
        );
        assert_eq!(prepared.series.len(), 10);
        assert_eq!(prepared.rejected_existing, 0);
        let p = &prepared.series.points[3];
        assert!((p.improvement - (p.existing - p.ai)).abs() < 1e-15);

        let config = PipelineConfig { iteration_limit: 100, ..Default::default() };
        let full = prepare_series(samples::VQE_EXISTING_SERIES, samples::VQE_GENERATED_SERIES, &config);
        assert_eq!(full.series.len(), 12);
    }

    #[test]
    fn series_label_filter_and_rejects() {
        let existing = "mof,energy\nA,\"(0, 1.0)\"\nB,\"(0, 5.0)\"\nA,\"(1, 0.5)\"\nbroken\n";
        let ai = "mof,energy\nG,\"(0, 0.8)\"\nG,\"(1, 0.25)\"\n";
        let config = PipelineConfig {
            existing_label: Some("A".into()),
            ..Default::default()
        };
        let prepared = prepare_series(existing, ai, &config);
        assert_eq!(prepared.rejected_existing, 1);
        assert_eq!(prepared.series.len(), 2);
        assert!((prepared.series.points[0].improvement - 0.2).abs() < 1e-12);

        let mut chart = prepared.into_chart();
        chart.set_mode(ViewMode::Ai);
        assert_eq!(chart.rows()[1].ai, Some(0.25));
        assert_eq!(chart.rows()[1].existing, None);
    }

    #[test]
    fn unlabeled_config_uses_first_series_label() {
        let existing = "mof,energy\nA,\"(0, 1.0)\"\nA,\"(1, 0.5)\"\nB,\"(0, 9.0)\"\nB,\"(1, 8.0)\"\n";
        let ai = "mof,energy\nG,\"(0, 0.8)\"\nG,\"(1, 0.25)\"\n";
        let prepared = prepare_series(existing, ai, &PipelineConfig::default());

        let steps: Vec<i64> = prepared.series.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert_eq!(prepared.series.points[0].existing, 1.0);
        assert_eq!(prepared.series.points[1].existing, 0.5);
        assert_eq!(prepared.summary.count, 2);
    }

    #[test]
    fn mixed_ai_labels_use_the_first_label() {
        let existing = "mof,energy\nA,\"(0, 1.0)\"\nA,\"(1, 0.5)\"\n";
        let ai = "mof,energy\nG,\"(0, 0.8)\"\nG,\"(1, 0.25)\"\nH,\"(0, 7.0)\"\nH,\"(1, 6.0)\"\n";
        let prepared = prepare_series(existing, ai, &PipelineConfig::default());

        let ai_values: Vec<f64> = prepared.series.iter().map(|p| p.ai).collect();
        assert_eq!(ai_values, vec![0.8, 0.25]);
    }
}
