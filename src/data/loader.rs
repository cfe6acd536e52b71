use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use serde_json::Value as JsonValue;

use super::model::CsvRow;
use super::tuple::{parse_tuple_text, TupleParse};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a header+rows table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`, `.txt` – plain comma-separated text, see [`parse_csv_text`]
/// * `.json` – `[{ "name": "MOF-5", "uptake": 2.4, ... }, ...]`
pub fn load_table(path: &Path) -> Result<Vec<CsvRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" | "txt" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading CSV file {}", path.display()))?;
            parse_csv_text(&text)?
        }
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load a tuple-encoded series file (`label,"(index, value)"` per line).
pub fn load_tuple_series(path: &Path) -> Result<TupleParse> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading series file {}", path.display()))?;
    let parsed = parse_tuple_text(&text);
    if !parsed.rejected.is_empty() {
        log::warn!(
            "{}: dropped {} malformed series line(s)",
            path.display(),
            parsed.rejected.len()
        );
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// CSV text
// ---------------------------------------------------------------------------

/// Split a header+rows text block into rows keyed by the trimmed header names.
///
/// The input is trimmed first.  Every comma is a separator (quotes are kept
/// as literal characters), so tuple-encoded columns need the dedicated
/// extractor in [`super::tuple`].  A row shorter than the header lacks the
/// trailing keys; extra trailing fields are ignored.
pub fn parse_csv_text(text: &str) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.trim().as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV header line")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "mof_id": "GEN-MOF-1", "predicted_co2_uptake": 4.81 },
///   ...
/// ]
/// ```
///
/// Scalars are rendered back to text so JSON tables go through the same
/// normalizer as CSV ones.  `null` fields are left out of the row.
fn load_json(path: &Path) -> Result<Vec<CsvRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<CsvRow> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .filter_map(|(key, val)| json_to_field(val).map(|v| (key.as_str(), v)))
                .collect())
        })
        .collect()
}

fn json_to_field(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}
