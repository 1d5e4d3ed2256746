use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::data::{AnnotatedSwing, Bar};

#[derive(Tabled)]
struct SwingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Swing")]
    kind: &'static str,
    #[tabled(rename = "Cycle")]
    cycle: String,
}

pub fn print_report(bars: &[Bar], swings: &[AnnotatedSwing]) {
    println!("\n=== Swing & Cycle Projections ===\n");

    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!(
            "Series: {} bars spanning {} to {}",
            bars.len(),
            first.date,
            last.date
        );
        println!("Last Close: {:.2}", last.close);
        let highest = bars.iter().map(|bar| bar.high).fold(f64::MIN, f64::max);
        println!("Highest High: {highest:.2}");
    }

    if swings.is_empty() {
        println!("\nNo swings confirmed at the configured threshold.");
        return;
    }

    let rows: Vec<SwingRow> = swings
        .iter()
        .map(|annotated| SwingRow {
            date: annotated.swing.date.to_string(),
            price: format!("{:.2}", annotated.swing.price),
            kind: annotated.swing.kind.as_str(),
            cycle: annotated.label.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{table}\n");
}

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "CyclePosition")]
    cycle_position: &'a str,
}

/// Write the annotated swing table as CSV for downstream charting.
pub fn export_swings_csv(path: &Path, swings: &[AnnotatedSwing]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {:?}", path))?;
    for annotated in swings {
        writer.serialize(ExportRow {
            date: annotated.swing.date.to_string(),
            price: annotated.swing.price,
            kind: annotated.swing.kind.as_str(),
            cycle_position: &annotated.label,
        })?;
    }
    writer.flush()?;
    Ok(())
}
