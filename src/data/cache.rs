use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{PERSISTENCE, series_cache_filename};
use crate::models::series::PriceSeries;
use crate::utils::time_utils::how_many_seconds_ago;

/// Serialized cache wrapper for the fetched daily series.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeriesCacheFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub data: PriceSeries,
}

impl SeriesCacheFile {
    pub fn new(data: PriceSeries) -> Self {
        Self {
            version: PERSISTENCE.series_cache.version,
            timestamp_ms: Utc::now().timestamp_millis(),
            data,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    pub fn default_cache_path(symbol: &str) -> PathBuf {
        PathBuf::from(PERSISTENCE.series_cache.directory).join(series_cache_filename(symbol))
    }

    /// Whether this cache can stand in for a fresh fetch of `symbol`.
    pub fn usable_for(&self, symbol: &str) -> Result<()> {
        ensure!(
            self.version == PERSISTENCE.series_cache.version,
            "cache version {} != expected {}",
            self.version,
            PERSISTENCE.series_cache.version
        );
        ensure!(
            self.data.symbol.eq_ignore_ascii_case(symbol),
            "cache holds {} not {}",
            self.data.symbol,
            symbol
        );
        ensure!(!self.data.is_empty(), "cache holds an empty series");

        let age_sec = how_many_seconds_ago(self.timestamp_ms);
        ensure!(
            age_sec <= PERSISTENCE.series_cache.acceptable_age_sec,
            "cache is {}s old (max {})",
            age_sec,
            PERSISTENCE.series_cache.acceptable_age_sec
        );
        Ok(())
    }
}

/// Write the freshly fetched series to its cache file off the UI path.
/// Serialization happens up front; only the write itself is awaited.
pub async fn write_series_cache_async(series: PriceSeries) -> Result<()> {
    let path = SeriesCacheFile::default_cache_path(&series.symbol);
    let cache = SeriesCacheFile::new(series);
    let bytes = bincode::serialize(&cache).context("Failed to serialize series cache")?;

    tokio::fs::create_dir_all(PERSISTENCE.series_cache.directory)
        .await
        .context("Failed to create cache directory")?;
    tokio::fs::write(&path, bytes)
        .await
        .context(format!("Failed to write cache to {:?}", path))?;

    log::info!("Cached {} bars to {:?}", cache.data.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::PriceBar;
    use crate::utils::TimeUtils;

    fn sample_series() -> PriceSeries {
        let mut series = PriceSeries::new("SPY", TimeUtils::MS_IN_D);
        series
            .push_bar(PriceBar::new(
                TimeUtils::MS_IN_D,
                402.0,
                410.0,
                400.0,
                404.0,
                1000.0,
            ))
            .unwrap();
        series
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daily_spy_v1.bin");

        let cache = SeriesCacheFile::new(sample_series());
        cache.save_to_path(&path).unwrap();

        let restored = SeriesCacheFile::load_from_path(&path).unwrap();
        assert_eq!(restored.version, PERSISTENCE.series_cache.version);
        assert_eq!(restored.data.symbol, "SPY");
        assert_eq!(restored.data.len(), 1);
        assert!(restored.usable_for("spy").is_ok(), "symbol match is case-insensitive");
    }

    #[test]
    fn test_usability_checks() {
        let mut cache = SeriesCacheFile::new(sample_series());
        assert!(cache.usable_for("SPY").is_ok());
        assert!(cache.usable_for("QQQ").is_err(), "wrong symbol");

        cache.version = 0.5;
        assert!(cache.usable_for("SPY").is_err(), "wrong version");

        let mut stale = SeriesCacheFile::new(sample_series());
        stale.timestamp_ms -= (PERSISTENCE.series_cache.acceptable_age_sec + 60) * 1000;
        assert!(stale.usable_for("SPY").is_err(), "too old");

        let empty = SeriesCacheFile::new(PriceSeries::new("SPY", TimeUtils::MS_IN_D));
        assert!(empty.usable_for("SPY").is_err(), "empty series");
    }
}
