//! mofcap - dataset preparation for the CarbonQapture MOF showcase
//!
//! Turns small tabular datasets about metal-organic frameworks into the
//! records the showcase charts bind to: existing vs AI-designed structures
//! ranked and paired with their percentage difference, and VQE convergence
//! runs aligned step by step.
//!
//! # Quick Start
//!
//! ```
//! use mofcap::{pipeline, samples, PipelineConfig, ViewMode};
//!
//! let prepared = pipeline::prepare_paired(samples::CARBON_CAPTURE, &PipelineConfig::default())
//!     .expect("embedded table parses");
//! println!("average difference: {:.1}%", prepared.summary.average);
//!
//! let mut chart = prepared.into_chart();
//! chart.set_mode(ViewMode::Ai);
//! assert!(chart.rows().iter().all(|row| row.existing.is_none()));
//! ```

pub mod config;
pub mod data;
pub mod pipeline;
pub mod samples;
pub mod state;
pub mod stats;

pub use config::{ConfigError, PipelineConfig};
pub use data::model::{ComparisonRecord, CsvRow, IterationPoint, IterationSeries, NamedMetric, PairedRow, RawSample};
pub use data::ranking::RankOrder;
pub use data::tuple::{TupleError, TupleParse};
pub use state::{ChartState, ProjectedRow, ViewMode};
pub use stats::DifferenceSummary;
