// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod narrative;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analysis::{LevelSet, compute_levels};
pub use domain::{DynamicZone, Level, LevelKind, PriceBar};
pub use engine::ScoutEngine;
pub use models::{IndicatorSet, PriceSeries};
pub use store::{FsSnapshotStore, LevelStore, SnapshotStore, StoreError};
pub use ui::LevelScoutApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ticker of the index-tracking instrument to analyse
    #[arg(long, default_value = "SPY")]
    pub symbol: String,

    /// Calendar days of daily history to request
    #[arg(long, default_value_t = config::ANALYSIS.window.lookback_days_default)]
    pub lookback_days: u32,

    /// Use the API as primary source instead of the local cache
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Never touch the network; start from the local cache or empty
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, engine: ScoutEngine) -> Box<dyn eframe::App> {
    let app = ui::LevelScoutApp::new(cc, engine);
    Box::new(app)
}
