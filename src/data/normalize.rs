use serde::{Deserialize, Serialize};

use super::model::{CsvRow, NamedMetric, PairedRow, RawSample};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Which columns of a table hold the structure name and its ranking metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name_column: String,
    pub metric_column: String,
}

impl ColumnSpec {
    pub fn new(name_column: impl Into<String>, metric_column: impl Into<String>) -> Self {
        ColumnSpec {
            name_column: name_column.into(),
            metric_column: metric_column.into(),
        }
    }
}

/// Columns of a pre-paired `name,existing,ai[,improvement]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedColumns {
    pub name_column: String,
    pub existing_column: String,
    pub ai_column: String,
    #[serde(default)]
    pub improvement_column: Option<String>,
}

impl Default for PairedColumns {
    fn default() -> Self {
        PairedColumns {
            name_column: "name".into(),
            existing_column: "existing".into(),
            ai_column: "ai".into(),
            improvement_column: Some("improvement".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient number parsing
// ---------------------------------------------------------------------------

/// Parse the longest numeric prefix of `s`, JavaScript `parseFloat` style.
///
/// `" 2.45 mmol/g"` → 2.45, `"27%"` → 27.0, `"-Infinity"` → −∞,
/// `"n/a"` → NaN.  No range checks.
pub fn parse_float(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if t[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    t[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a base-10 integer prefix, JavaScript `parseInt(s, 10)` style.
/// `None` plays the role of NaN.
pub fn parse_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    t[..sign + digits].trim_start_matches('+').parse().ok()
}

/// `"27%"` → `Some(27.0)`; anything without a numeric prefix → `None`.
pub fn parse_percent(s: &str) -> Option<f64> {
    let v = parse_float(s);
    (!v.is_nan()).then_some(v)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn field_f64(row: &CsvRow, column: &str) -> f64 {
    row.get(column).map_or(f64::NAN, parse_float)
}

// ---------------------------------------------------------------------------
// Row → record conversions
// ---------------------------------------------------------------------------

/// Map table rows to [`NamedMetric`]s.
///
/// A missing or malformed metric becomes NaN and is passed on as-is; a
/// missing name becomes an empty string.
pub fn to_named_metrics(rows: &[CsvRow], columns: &ColumnSpec) -> Vec<NamedMetric> {
    rows.iter()
        .map(|row| NamedMetric {
            name: row.get(&columns.name_column).unwrap_or_default().to_string(),
            metric: field_f64(row, &columns.metric_column),
        })
        .collect()
}

/// Map table rows to [`RawSample`]s.  Rows without an integer index prefix
/// are skipped since an index cannot be NaN.
pub fn to_raw_samples(
    rows: &[CsvRow],
    label_column: &str,
    index_column: &str,
    value_column: &str,
) -> Vec<RawSample> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let Some(index) = row.get(index_column).and_then(parse_int) else {
                log::debug!("row {i}: no integer in '{index_column}', skipped");
                return None;
            };
            Some(RawSample {
                label: row.get(label_column).unwrap_or_default().to_string(),
                index,
                value: field_f64(row, value_column),
            })
        })
        .collect()
}

/// Map rows of a pre-paired table to [`PairedRow`]s.
pub fn to_paired_rows(rows: &[CsvRow], columns: &PairedColumns) -> Vec<PairedRow> {
    rows.iter()
        .map(|row| PairedRow {
            name: row.get(&columns.name_column).unwrap_or_default().to_string(),
            existing: field_f64(row, &columns.existing_column),
            ai: field_f64(row, &columns.ai_column),
            published_improvement: columns
                .improvement_column
                .as_deref()
                .and_then(|c| row.get(c))
                .and_then(parse_percent),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parse_float_takes_numeric_prefix() {
        assert_eq!(parse_float("2.45"), 2.45);
        assert_eq!(parse_float("  -1245"), -1245.0);
        assert_eq!(parse_float("27%"), 27.0);
        assert_eq!(parse_float(".5x"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_float("0.08993839468167288"), 0.08993839468167288);
    }

    #[test]
    fn parse_float_without_digits_is_nan() {
        assert!(parse_float("").is_nan());
        assert!(parse_float("n/a").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float(".").is_nan());
    }

    #[test]
    fn parse_int_prefix() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int(" -3.7"), Some(-3));
        assert_eq!(parse_int("+4"), Some(4));
        assert_eq!(parse_int("step"), None);
    }

    #[test]
    fn named_metrics_propagate_nan_for_missing_fields() {
        let rows = vec![
            row(&[("mof_id", "GEN-MOF-1"), ("predicted_co2_uptake", "4.81")]),
            row(&[("mof_id", "GEN-MOF-2")]),
            row(&[("predicted_co2_uptake", "oops")]),
        ];
        let spec = ColumnSpec::new("mof_id", "predicted_co2_uptake");
        let metrics = to_named_metrics(&rows, &spec);

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0], NamedMetric::new("GEN-MOF-1", 4.81));
        assert!(metrics[1].metric.is_nan());
        assert_eq!(metrics[2].name, "");
        assert!(metrics[2].metric.is_nan());
    }

    #[test]
    fn raw_samples_skip_rows_without_index() {
        let rows = vec![
            row(&[("mof", "a"), ("iter", "0"), ("energy", "-0.5")]),
            row(&[("mof", "a"), ("iter", "x"), ("energy", "-0.6")]),
            row(&[("mof", "a"), ("iter", "2")]),
        ];
        let samples = to_raw_samples(&rows, "mof", "iter", "energy");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].value, -0.5);
        assert_eq!(samples[1].index, 2);
        assert!(samples[1].value.is_nan());
    }

    #[test]
    fn paired_rows_read_published_improvement() {
        let rows = vec![
            row(&[("name", "MOF-5"), ("existing", "245"), ("ai", "312"), ("improvement", "27%")]),
            row(&[("name", "ZIF-8"), ("existing", "167"), ("ai", "210")]),
        ];
        let paired = to_paired_rows(&rows, &PairedColumns::default());
        assert_eq!(paired[0].published_improvement, Some(27.0));
        assert_eq!(paired[0].ai, 312.0);
        assert_eq!(paired[1].published_improvement, None);
    }
}
