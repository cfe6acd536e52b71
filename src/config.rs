use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::normalize::{ColumnSpec, PairedColumns};
use crate::data::ranking::RankOrder;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("top_n must be at least 1")]
    ZeroTopN,
}

/// Tunables for the comparison and series pipelines.  Every field has a
/// default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Entries kept from each ranked collection.
    pub top_n: usize,
    /// Maximum points in an iteration series.
    pub iteration_limit: usize,
    pub order: RankOrder,
    /// Columns of the existing-structure table.
    pub existing: ColumnSpec,
    /// Columns of the AI-generated table.
    pub ai: ColumnSpec,
    pub paired: PairedColumns,
    /// Restrict the existing series to one label.
    pub existing_label: Option<String>,
    /// Restrict the AI series to one label.
    pub ai_label: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            iteration_limit: 10,
            order: RankOrder::Descending,
            existing: ColumnSpec::new("name", "CO2_uptake_P0.15bar_T298K [mmol/g]"),
            ai: ColumnSpec::new("mof_id", "predicted_co2_uptake"),
            paired: PairedColumns::default(),
            existing_label: None,
            ai_label: None,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        Ok(())
    }
}
