mod analysis;
mod config;
mod data;
mod loader;
mod output;
mod resample;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use analysis::{cached_table, cycle_label, detect_swings};
use config::{AppConfig, Timeframe};
use data::AnnotatedSwing;
use loader::{load_bars_from_csv, validate_series};
use output::{export_swings_csv, print_report};
use resample::resample_weekly;

fn main() -> Result<()> {
    let config = AppConfig::parse();
    run(&config)
}

fn run(config: &AppConfig) -> Result<()> {
    let input_path = &config.input_path;
    if !Path::new(input_path).exists() {
        bail!("input file {:?} does not exist", input_path);
    }

    let daily = load_bars_from_csv(input_path)
        .with_context(|| format!("failed to load input data from {:?}", input_path))?;
    validate_series(&daily)?;

    let bars = match config.timeframe {
        Timeframe::Daily => daily,
        Timeframe::Weekly => resample_weekly(&daily),
    };
    if bars.is_empty() {
        bail!("no bars remain after resampling");
    }
    validate_series(&bars)?;

    let start = bars.first().unwrap();
    let end = bars.last().unwrap();
    println!(
        "Loaded {} {} bars spanning {} to {}",
        bars.len(),
        config.timeframe.as_str(),
        start.date,
        end.date
    );

    let swings = detect_swings(&bars, config.threshold, config.swing_mode)?;
    println!(
        "Detected {} swing points at a {:.1}% reversal threshold",
        swings.len(),
        config.threshold * 100.0
    );

    let table = cached_table(config.cycle_start, config.cycle_step, config.cycle_max_price)?;
    let levels = table.levels();
    if let Some(top) = levels.last() {
        println!(
            "Cycle ladder: {} levels topping out at {:.2}",
            levels.len(),
            top
        );
    }

    let annotated: Vec<AnnotatedSwing> = swings
        .into_iter()
        .map(|swing| {
            let fraction = table.fraction(swing.price);
            AnnotatedSwing {
                swing,
                fraction,
                label: cycle_label(fraction),
            }
        })
        .collect();

    print_report(&bars, &annotated);

    if let Some(export_path) = &config.export {
        export_swings_csv(export_path, &annotated)
            .with_context(|| format!("failed to export swings to {:?}", export_path))?;
        println!("Exported {} annotated swings to {:?}", annotated.len(), export_path);
    }

    Ok(())
}
