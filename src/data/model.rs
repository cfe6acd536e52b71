use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CsvRow – one data line of a header+rows text block
// ---------------------------------------------------------------------------

/// A single parsed CSV line: header name → trimmed field.
///
/// Short rows simply lack the trailing keys; lookups for those columns
/// return `None` instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CsvRow {
    pub fields: BTreeMap<String, String>,
}

impl CsvRow {
    /// Field value for `column`, if the row reached that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Column names present on this row, in header-name order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CsvRow {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawSample – one decoded "(index, value)" observation
// ---------------------------------------------------------------------------

/// One row decoded from a series dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSample {
    /// Source structure, e.g. `gen-mof-1`.
    pub label: String,
    /// 0-based position inside the label's sequence.
    pub index: i64,
    /// Measured or predicted quantity (uptake in mmol/g, or energy).
    pub value: f64,
}

// ---------------------------------------------------------------------------
// NamedMetric / PairedRow – tabular inputs to the comparison
// ---------------------------------------------------------------------------

/// A structure identified by name with a single ranking metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedMetric {
    pub name: String,
    pub metric: f64,
}

impl NamedMetric {
    pub fn new(name: impl Into<String>, metric: f64) -> Self {
        NamedMetric {
            name: name.into(),
            metric,
        }
    }
}

/// A row from a dataset that already pairs an existing and an AI-designed
/// value under one name (`name,existing,ai,improvement`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedRow {
    pub name: String,
    pub existing: f64,
    pub ai: f64,
    /// Improvement figure as published alongside the data (`"27%"` → 27.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_improvement: Option<f64>,
}

// ---------------------------------------------------------------------------
// ComparisonRecord – Nth existing entry vs Nth AI entry
// ---------------------------------------------------------------------------

/// The Nth-ranked entry of two independently ranked collections, side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    /// 1-based, dense.
    pub position: usize,
    pub existing_name: String,
    pub ai_name: String,
    pub existing_value: f64,
    pub ai_value: f64,
    /// `|existing − ai| / existing × 100`, one decimal.
    pub difference_percent: f64,
}

// ---------------------------------------------------------------------------
// IterationSeries – two convergence runs aligned by step
// ---------------------------------------------------------------------------

/// One shared iteration step of two series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationPoint {
    pub step: i64,
    pub existing: f64,
    pub ai: f64,
    /// `existing − ai`; positive does not necessarily mean the AI run is better.
    pub improvement: f64,
}

/// Ordered iteration points, already truncated to the configured limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IterationSeries {
    pub points: Vec<IterationPoint>,
}

impl IterationSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IterationPoint> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_row_lookup_is_absent() {
        let row: CsvRow = [("name", "MOF-5")].into_iter().collect();
        assert_eq!(row.get("name"), Some("MOF-5"));
        assert_eq!(row.get("uptake"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn comparison_record_serializes_camel_case() {
        let rec = ComparisonRecord {
            position: 1,
            existing_name: "MOF-5".into(),
            ai_name: "GEN-MOF-1".into(),
            existing_value: 245.0,
            ai_value: 312.0,
            difference_percent: 27.3,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["existingName"], "MOF-5");
        assert_eq!(json["differencePercent"], 27.3);
    }

    #[test]
    fn paired_row_omits_missing_improvement() {
        let row = PairedRow {
            name: "ZIF-8".into(),
            existing: 167.0,
            ai: 210.0,
            published_improvement: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("published_improvement"));
    }
}
