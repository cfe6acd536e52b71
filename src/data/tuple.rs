use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::model::RawSample;

/// `label,"(index, value)"` – the label is everything before the first `,"(`.
static TUPLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(.*?),"\(\s*([-+]?\d+)\s*,\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)""#)
        .expect("tuple line pattern is valid")
});

// ---------------------------------------------------------------------------
// Per-line result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum TupleError {
    #[error("line does not match `label,\"(index, value)\"`")]
    PatternMismatch,
    #[error("index `{0}` does not fit a 64-bit integer")]
    InvalidIndex(String),
    #[error("value `{0}` is not a number")]
    InvalidValue(String),
}

/// A data line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number within the input text (the header is line 1).
    pub line_no: usize,
    pub line: String,
    pub error: TupleError,
}

/// Everything decoded from one tuple-encoded text block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TupleParse {
    pub samples: Vec<RawSample>,
    pub rejected: Vec<RejectedLine>,
}

impl TupleParse {
    /// True when the block had no data lines at all.
    pub fn is_empty_input(&self) -> bool {
        self.samples.is_empty() && self.rejected.is_empty()
    }
}

/// Decode a single `label,"(index, value)"` line.
pub fn parse_tuple_line(line: &str) -> Result<RawSample, TupleError> {
    let caps = TUPLE_LINE
        .captures(line.trim())
        .ok_or(TupleError::PatternMismatch)?;

    let label = &caps[1];
    let index_text = &caps[2];
    let value_text = &caps[3];

    let index = index_text
        .trim_start_matches('+')
        .parse::<i64>()
        .map_err(|_| TupleError::InvalidIndex(index_text.to_string()))?;
    let value = value_text
        .parse::<f64>()
        .map_err(|_| TupleError::InvalidValue(value_text.to_string()))?;

    Ok(RawSample {
        label: label.to_string(),
        index,
        value,
    })
}

/// Decode a header + tuple-rows text block.
///
/// The first non-blank line is the header and is skipped.  Blank lines carry
/// no data and are ignored; every other line ends up either in `samples` or
/// in `rejected`, in input order.
pub fn parse_tuple_text(text: &str) -> TupleParse {
    let mut out = TupleParse::default();

    let mut lines = text
        .lines()
        .enumerate()
        .skip_while(|(_, l)| l.trim().is_empty());
    // header
    lines.next();

    for (i, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_tuple_line(line) {
            Ok(sample) => out.samples.push(sample),
            Err(error) => {
                log::debug!("series line {}: {error}", i + 1);
                out.rejected.push(RejectedLine {
                    line_no: i + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }

    out
}
