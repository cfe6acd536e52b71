use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::{ComparisonRecord, IterationSeries};
use crate::stats::DifferenceSummary;

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

/// Which side(s) of the comparison a chart shows.  Any mode may follow any
/// other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Existing,
    Ai,
    #[default]
    Comparison,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Existing, ViewMode::Ai, ViewMode::Comparison];

    fn shows_existing(self) -> bool {
        matches!(self, ViewMode::Existing | ViewMode::Comparison)
    }

    fn shows_ai(self) -> bool {
        matches!(self, ViewMode::Ai | ViewMode::Comparison)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Existing => write!(f, "existing"),
            ViewMode::Ai => write!(f, "ai"),
            ViewMode::Comparison => write!(f, "comparison"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "existing" => Ok(ViewMode::Existing),
            "ai" => Ok(ViewMode::Ai),
            "comparison" | "compare" => Ok(ViewMode::Comparison),
            other => Err(format!(
                "unknown view mode '{other}' (expected existing, ai or comparison)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Projected rows – what a chart binds to
// ---------------------------------------------------------------------------

/// One chart datum.  Fields the current mode hides are `None` and left out
/// of the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRow {
    /// x-axis key: structure name, rank position or iteration step.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<f64>,
}

/// Project comparison records for a bar chart.
///
/// Single-sided modes key each row by that side's structure name; the
/// comparison mode keys by name when both sides share one and by rank
/// position otherwise, and carries both names.
pub fn project_comparison(records: &[ComparisonRecord], mode: ViewMode) -> Vec<ProjectedRow> {
    records
        .iter()
        .map(|r| match mode {
            ViewMode::Existing => ProjectedRow {
                key: r.existing_name.clone(),
                existing_name: None,
                ai_name: None,
                existing: Some(r.existing_value),
                ai: None,
            },
            ViewMode::Ai => ProjectedRow {
                key: r.ai_name.clone(),
                existing_name: None,
                ai_name: None,
                existing: None,
                ai: Some(r.ai_value),
            },
            ViewMode::Comparison => ProjectedRow {
                key: if r.existing_name == r.ai_name {
                    r.existing_name.clone()
                } else {
                    format!("#{}", r.position)
                },
                existing_name: Some(r.existing_name.clone()),
                ai_name: Some(r.ai_name.clone()),
                existing: Some(r.existing_value),
                ai: Some(r.ai_value),
            },
        })
        .collect()
}

/// Project an iteration series for a line chart, keyed by step.
pub fn project_series(series: &IterationSeries, mode: ViewMode) -> Vec<ProjectedRow> {
    series
        .iter()
        .map(|p| ProjectedRow {
            key: p.step.to_string(),
            existing_name: None,
            ai_name: None,
            existing: mode.shows_existing().then_some(p.existing),
            ai: mode.shows_ai().then_some(p.ai),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart state
// ---------------------------------------------------------------------------

/// Prepared data behind a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Comparison(Vec<ComparisonRecord>),
    Series(IterationSeries),
}

/// The state a chart component owns: its prepared data, their summary and
/// the selected view mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub data: ChartData,
    pub summary: DifferenceSummary,
    pub mode: ViewMode,
}

impl ChartState {
    pub fn new(data: ChartData, summary: DifferenceSummary) -> Self {
        Self {
            data,
            summary,
            mode: ViewMode::default(),
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Rows for the current mode.
    pub fn rows(&self) -> Vec<ProjectedRow> {
        match &self.data {
            ChartData::Comparison(records) => project_comparison(records, self.mode),
            ChartData::Series(series) => project_series(series, self.mode),
        }
    }
}
