//! Datasets compiled into the binary, used when no files are given.

/// Published carbon-capture comparison (`name,existing,ai,improvement`).
pub const CARBON_CAPTURE: &str = include_str!("../data/carbon_capture.csv");

/// Published ground-state-energy comparison, same layout as [`CARBON_CAPTURE`].
pub const GROUND_STATE_ENERGY: &str = include_str!("../data/ground_state_energy.csv");

/// Screening results for existing MOFs.
pub const EXISTING_MOFS: &str = include_str!("../data/existing_mofs.csv");

/// Property predictions for generated MOFs.
pub const GENERATED_MOFS: &str = include_str!("../data/generated_mofs.csv");

/// VQE convergence for an existing MOF, tuple-encoded.
pub const VQE_EXISTING_SERIES: &str = include_str!("../data/vqe_existing_series.csv");

/// VQE convergence for a generated MOF, tuple-encoded.
pub const VQE_GENERATED_SERIES: &str = include_str!("../data/vqe_generated_series.csv");
