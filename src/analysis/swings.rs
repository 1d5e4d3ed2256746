use clap::ValueEnum;

use crate::analysis::AnalysisError;
use crate::data::{Bar, SwingKind, SwingPoint};

/// Which prices feed the swing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwingMode {
    /// Bar highs while seeking a top, bar lows while seeking a low.
    HighLow,
    /// Closing prices regardless of direction.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    SeekingTop,
    SeekingLow,
}

impl SwingMode {
    /// Price that can extend the running extreme.
    fn candidate(self, bar: &Bar, trend: Trend) -> f64 {
        match self {
            SwingMode::Close => bar.close,
            SwingMode::HighLow => match trend {
                Trend::SeekingTop => bar.high,
                Trend::SeekingLow => bar.low,
            },
        }
    }

    /// Price checked against the retracement threshold; also seeds the next
    /// leg's extreme once a reversal is confirmed.
    fn reversal_side(self, bar: &Bar, trend: Trend) -> f64 {
        match self {
            SwingMode::Close => bar.close,
            SwingMode::HighLow => match trend {
                Trend::SeekingTop => bar.low,
                Trend::SeekingLow => bar.high,
            },
        }
    }
}

/// Detect alternating swing tops and lows with a single-pass zig-zag scan.
///
/// A running extreme is extended while price keeps pushing in the current
/// direction and confirmed as a swing point once the reversal-side price
/// retraces by more than `threshold` (fractional, e.g. 0.05 for 5%). The
/// scan always starts out seeking a low from bar 0. A trailing extreme that
/// never sees a confirming reversal is dropped, so series that only trend
/// produce no swings at all.
pub fn detect_swings(
    bars: &[Bar],
    threshold: f64,
    mode: SwingMode,
) -> Result<Vec<SwingPoint>, AnalysisError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(AnalysisError::InvalidArgument(format!(
            "reversal threshold must be positive and finite, got {threshold}"
        )));
    }
    for (idx, bar) in bars.iter().enumerate() {
        if [bar.open, bar.high, bar.low, bar.close]
            .iter()
            .any(|price| !price.is_finite() || *price <= 0.0)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "non-finite or non-positive price at bar {idx} ({})",
                bar.date
            )));
        }
    }
    if bars.len() < 2 {
        return Ok(Vec::new());
    }

    let mut swings = Vec::new();
    let mut trend = Trend::SeekingLow;
    let mut extreme_price = match mode {
        SwingMode::HighLow => bars[0].low,
        SwingMode::Close => bars[0].close,
    };
    let mut extreme_index = 0usize;

    for (k, bar) in bars.iter().enumerate().skip(1) {
        let candidate = mode.candidate(bar, trend);
        match trend {
            Trend::SeekingTop => {
                if candidate > extreme_price {
                    extreme_price = candidate;
                    extreme_index = k;
                } else {
                    let reversal = mode.reversal_side(bar, trend);
                    if reversal < extreme_price * (1.0 - threshold) {
                        swings.push(SwingPoint {
                            date: bars[extreme_index].date,
                            price: extreme_price,
                            kind: SwingKind::Top,
                        });
                        trend = Trend::SeekingLow;
                        extreme_price = reversal;
                        extreme_index = k;
                    }
                }
            }
            Trend::SeekingLow => {
                if candidate < extreme_price {
                    extreme_price = candidate;
                    extreme_index = k;
                } else {
                    let reversal = mode.reversal_side(bar, trend);
                    if reversal > extreme_price * (1.0 + threshold) {
                        swings.push(SwingPoint {
                            date: bars[extreme_index].date,
                            price: extreme_price,
                            kind: SwingKind::Low,
                        });
                        trend = Trend::SeekingTop;
                        extreme_price = reversal;
                        extreme_index = k;
                    }
                }
            }
        }
    }

    Ok(swings)
}
