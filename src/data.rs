use chrono::NaiveDate;
use serde::Serialize;

/// Single OHLC bar sampled at a daily or weekly interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwingKind {
    Top,
    Low,
}

impl SwingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwingKind::Top => "Top",
            SwingKind::Low => "Low",
        }
    }
}

/// Confirmed local price extremum surviving a minimum percentage reversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: SwingKind,
}

/// A price's position on the cycle ladder: whole turns completed plus the
/// angle travelled into the current turn, always in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleAnnotation {
    pub cycle_index: u32,
    pub angle_degrees: f64,
}

/// Swing point paired with its cycle-ladder coordinates, ready for the
/// report table or CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedSwing {
    pub swing: SwingPoint,
    pub fraction: f64,
    pub label: String,
}
