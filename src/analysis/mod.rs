pub mod cycle;
pub mod swings;

pub use cycle::{cached_table, cycle_label, CycleLevelTable};
pub use swings::{detect_swings, SwingMode};

use thiserror::Error;

/// Failures surfaced by the analysis core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A caller-supplied parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dirty data reached the detector despite upstream cleaning.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
