// Headless level report: fetch (or load cached) history, compute levels,
// print the same numbers the dashboard renders. Useful for scripting and for
// sanity-checking a symbol without opening the UI.

use anyhow::ensure;
use clap::Parser;
use tokio::runtime::Runtime;

use level_scout::Cli;
use level_scout::analysis::compute_levels;
use level_scout::data::load_market_data;
use level_scout::models::IndicatorSet;
use level_scout::narrative::{NarrativeService, TemplateNarrative};
use level_scout::utils::time_utils::epoch_ms_to_date;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args = Cli::parse();

    let rt = Runtime::new()?;
    let (series, data_source) = rt.block_on(load_market_data(&args));
    ensure!(
        !series.is_empty(),
        "no price history available for {}",
        args.symbol
    );

    let indicators = IndicatorSet::compute(&series);
    let levels = compute_levels(&series, Some(&indicators));
    ensure!(
        !levels.is_empty(),
        "insufficient data to derive levels for {}",
        args.symbol
    );

    let first = series.first_timestamp_ms().unwrap_or_default();
    let last = series.last_timestamp_ms().unwrap_or_default();
    println!(
        "{}: {} bars ({} .. {}) via {}",
        args.symbol,
        series.len(),
        epoch_ms_to_date(first),
        epoch_ms_to_date(last),
        data_source,
    );

    println!("\nResistance (highest first):");
    for price in levels.resistances.iter().rev() {
        println!("  {:.2}", price);
    }
    println!("Support (lowest first):");
    for price in &levels.supports {
        println!("  {:.2}", price);
    }
    println!("Magnet: {:.2}", levels.magnet);

    match TemplateNarrative.trading_plan(&args.symbol, &levels) {
        Ok(plan) => println!("\n{}", plan),
        Err(e) => println!("\n(no plan: {e})"),
    }

    Ok(())
}
