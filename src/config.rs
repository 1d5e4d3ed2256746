use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::analysis::SwingMode;

/// Sampling interval of the analyzed series. Weekly applies an upstream
/// resampling pass before detection; it never changes the detector itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Timeframe {
    Daily,
    Weekly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
        }
    }
}

/// Command-line configuration for the swing and cycle projection tool.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Input CSV file path containing Date/Open/High/Low/Close columns.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input_path: String,

    /// Minimum fractional retracement confirming a reversal (0.05 = 5%).
    #[arg(long, default_value_t = 0.05)]
    pub threshold: f64,

    /// Bar interval to analyze.
    #[arg(long, value_enum, default_value = "daily")]
    pub timeframe: Timeframe,

    /// Price source for swing detection.
    #[arg(long, value_enum, default_value = "high-low")]
    pub swing_mode: SwingMode,

    /// First level of the cycle ladder.
    #[arg(long, default_value_t = 1.0)]
    pub cycle_start: f64,

    /// Growth increment applied in the square-root domain between levels.
    #[arg(long, default_value_t = 0.25)]
    pub cycle_step: f64,

    /// Ceiling up to which cycle levels are generated.
    #[arg(long, default_value_t = 50_000.0)]
    pub cycle_max_price: f64,

    /// Optional path to export the annotated swing table as CSV.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}
