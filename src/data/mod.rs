/// Data layer: record types, text parsing, normalization and ranking.
///
/// Architecture:
/// ```text
///  header+rows text          label,"(i, v)" text
///        │                          │
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │  loader   │ → CsvRow     │  tuple    │ → RawSample (+ rejected lines)
///   └──────────┘              └──────────┘
///        │                          │
///        ▼                          │
///   ┌───────────┐                   │
///   │ normalize  │ → NamedMetric / PairedRow
///   └───────────┘                   │
///        │                          │
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │ ranking   │ → Comparison │  stats    │ → IterationSeries
///   └──────────┘   Record      └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod tuple;
