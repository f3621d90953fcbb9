// Data loading and caching
pub mod cache;
pub mod fetch;
pub mod news;

// Re-export commonly used types
pub use cache::{SeriesCacheFile, write_series_cache_async};
pub use fetch::{DataError, StooqClient};
pub use news::{CalendarEvent, Headline, fetch_calendar, fetch_headlines};

use crate::Cli;
use crate::models::series::PriceSeries;
use crate::utils::TimeUtils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

pub const SOURCE_CACHE: &str = "local cache";
pub const SOURCE_API: &str = "quote api";
pub const SOURCE_NONE: &str = "unavailable";

/// Load price history before the GUI starts.
///
/// Cache-vs-API ordering follows the CLI flags: the local cache wins when it
/// is fresh unless `--prefer-api` flips the priority, and `--offline` never
/// touches the network. Total failure degrades to an empty series so the
/// dashboard still opens (showing "insufficient data" everywhere).
pub async fn load_market_data(args: &Cli) -> (PriceSeries, &'static str) {
    let cached = read_usable_cache(&args.symbol);

    if args.offline {
        return match cached {
            Some(series) => (series, SOURCE_CACHE),
            None => {
                log::error!("--offline set but no usable cache for {}", args.symbol);
                (empty_series(args), SOURCE_NONE)
            }
        };
    }

    if args.prefer_api {
        match fetch_from_api(args).await {
            Ok(series) => return (series, SOURCE_API),
            Err(e) => log::warn!("⚠️  API fetch failed: {e:#}; falling back to cache"),
        }
        if let Some(series) = cached {
            return (series, SOURCE_CACHE);
        }
    } else {
        if let Some(series) = cached {
            return (series, SOURCE_CACHE);
        }
        match fetch_from_api(args).await {
            Ok(series) => return (series, SOURCE_API),
            Err(e) => log::error!("API fetch failed: {e:#}"),
        }
    }

    log::error!(
        "No price history available for {}; dashboard starts empty",
        args.symbol
    );
    (empty_series(args), SOURCE_NONE)
}

fn empty_series(args: &Cli) -> PriceSeries {
    PriceSeries::new(args.symbol.clone(), TimeUtils::MS_IN_D)
}

fn read_usable_cache(symbol: &str) -> Option<PriceSeries> {
    let path = SeriesCacheFile::default_cache_path(symbol);
    match SeriesCacheFile::load_from_path(&path) {
        Ok(cache) => match cache.usable_for(symbol) {
            Ok(()) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_data_loading {
                    log::info!("Using cached series from {:?}", path);
                }
                Some(cache.data)
            }
            Err(e) => {
                log::warn!("⚠️  Local cache validation failed: {e:#}");
                None
            }
        },
        Err(_e) => {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_data_loading {
                log::info!("No readable cache at {:?}: {:#}", path, _e);
            }
            None
        }
    }
}

async fn fetch_from_api(args: &Cli) -> Result<PriceSeries, DataError> {
    let client = StooqClient::new()?;
    client.daily_series(&args.symbol, args.lookback_days).await
}
