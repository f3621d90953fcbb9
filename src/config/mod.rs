//! Configuration module for the level-scout application.

pub mod analysis;
pub mod market_data;
pub mod persistence;
pub mod plot;

mod debug; // Private; the public re-export forces files to use crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use market_data::MARKET_DATA;
pub use persistence::{PERSISTENCE, series_cache_filename, snapshot_filename};
pub use plot::PLOT_CONFIG;
